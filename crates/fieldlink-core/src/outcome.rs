//! Results of registry operations that can legitimately do nothing.
//!
//! Three kinds of "no" exist in the engine:
//!
//! - **Capacity**: the source is out of outbound slots
//!   ([`LinkOutcome::rejected_capacity`]). Recoverable; nothing changed.
//! - **Rejection**: a candidate triangle was not accepted
//!   ([`TriangleOutcome::EnemyInside`], [`TriangleOutcome::Duplicate`],
//!   [`TriangleOutcome::Degenerate`]). Normal play; nothing changed.
//! - **Error**: the arguments could not be valid
//!   ([`crate::error::RegistryError`]). Returned as `Err`, not an outcome.

use serde::{Deserialize, Serialize};

use crate::beacon::{Location, TeamId};
use crate::field::TriangleField;

/// What happened to one candidate triangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriangleOutcome {
    /// A new field was added and its area credited.
    Created {
        /// The new field
        field: TriangleField,
    },
    /// The same three vertices already form a field.
    Duplicate {
        /// Candidate vertices
        vertices: [Location; 3],
    },
    /// A beacon of another team sits strictly inside the candidate.
    EnemyInside {
        /// Candidate vertices
        vertices: [Location; 3],
        /// First enemy beacon found inside
        enemy: Location,
    },
    /// The three vertices are collinear.
    Degenerate {
        /// Candidate vertices
        vertices: [Location; 3],
    },
}

impl TriangleOutcome {
    /// Returns `true` if a field was created.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// The created field, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&TriangleField> {
        match self {
            Self::Created { field } => Some(field),
            _ => None,
        }
    }

    /// The candidate vertices.
    #[must_use]
    pub fn vertices(&self) -> [Location; 3] {
        match self {
            Self::Created { field } => field.vertices(),
            Self::Duplicate { vertices }
            | Self::EnemyInside { vertices, .. }
            | Self::Degenerate { vertices } => *vertices,
        }
    }
}

/// Result of [`crate::registry::Registry::add_outbound_link`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOutcome {
    /// The source recorded a new outbound link.
    pub created: bool,
    /// The destination recorded the backlink.
    pub reciprocated: bool,
    /// Every triangle the new link closed, in discovery order.
    pub fields_formed: Vec<TriangleOutcome>,
    /// The source had no outbound slot left; nothing changed.
    pub rejected_capacity: bool,
}

impl LinkOutcome {
    /// Outcome for a link that was already present.
    #[must_use]
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Outcome for a source with no free outbound slot.
    #[must_use]
    pub fn capacity_rejected() -> Self {
        Self {
            rejected_capacity: true,
            ..Self::default()
        }
    }

    /// Fields that were actually created.
    pub fn fields_created(&self) -> impl Iterator<Item = &TriangleField> + '_ {
        self.fields_formed.iter().filter_map(TriangleOutcome::field)
    }

    /// Total area credited by this link.
    #[must_use]
    pub fn area_gained(&self) -> i64 {
        self.fields_created().map(TriangleField::area).sum()
    }
}

/// Result of releasing a beacon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseOutcome {
    /// Owner before the release.
    pub previous_owner: Option<TeamId>,
    /// Beacons that were linked to the released one.
    pub unlinked: Vec<Location>,
    /// Fields that used the beacon as a vertex, owners stripped.
    pub fields_removed: Vec<TriangleField>,
    /// Total area debited from the ledger.
    pub score_reversed: i64,
    /// Number of resonators and mods removed.
    pub artifacts_stripped: usize,
}
