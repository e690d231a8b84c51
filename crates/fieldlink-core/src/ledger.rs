//! Per-team score ledger.
//!
//! A team's score is the sum of the areas of the fields it owns. The ledger
//! is only written by the registry, in the same step that inserts or removes
//! a field; everyone else reads it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::error;

use crate::beacon::TeamId;

/// Integer score per team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    scores: BTreeMap<TeamId, i64>,
}

impl ScoreLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current score of `team`; zero if it never scored.
    #[must_use]
    pub fn score(&self, team: TeamId) -> i64 {
        self.scores.get(&team).copied().unwrap_or(0)
    }

    /// Returns `true` if `team` has ever been credited.
    #[must_use]
    pub fn has_entry(&self, team: TeamId) -> bool {
        self.scores.contains_key(&team)
    }

    /// All recorded scores in team order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, i64)> + '_ {
        self.scores.iter().map(|(team, score)| (*team, *score))
    }

    /// Number of teams with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` if no team has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub(crate) fn credit(&mut self, team: TeamId, amount: i64) -> i64 {
        let score = self.scores.entry(team).or_insert(0);
        *score += amount;
        *score
    }

    /// Subtracts `amount`. Going negative means a field was debited twice or
    /// never credited; the debit still applies so audits can see it.
    pub(crate) fn debit(&mut self, team: TeamId, amount: i64) -> i64 {
        let score = self.scores.entry(team).or_insert(0);
        *score -= amount;
        if *score < 0 {
            error!(%team, amount, score = *score, "score ledger went negative");
        }
        *score
    }
}
