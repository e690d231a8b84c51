//! Registry invariants: sanity checks that detect bugs.
//!
//! None of these should ever fire for a registry driven only through its
//! public API. Tests and debug tooling call [`audit`] after every step.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::beacon::TeamId;
use crate::registry::Registry;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check all registry invariants.
///
/// Returns every violation found, or an empty list if all invariants hold.
#[must_use]
pub fn audit(registry: &Registry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    check_beacons(registry, &mut violations);
    check_links(registry, &mut violations);
    check_fields(registry, &mut violations);
    check_scores(registry, &mut violations);
    violations
}

fn check_beacons(registry: &Registry, violations: &mut Vec<InvariantViolation>) {
    let config = registry.config();

    for beacon in registry.beacons() {
        let location = beacon.location();

        if beacon.outbound_count() > config.max_outbound_links {
            violations.push(InvariantViolation::new(format!(
                "beacon at {location} has {} outbound links > cap {}",
                beacon.outbound_count(),
                config.max_outbound_links
            )));
        }

        let originated = registry
            .links()
            .filter(|link| link.origin() == location)
            .count();
        if originated != usize::from(beacon.outbound_count()) {
            violations.push(InvariantViolation::new(format!(
                "beacon at {location} counts {} outbound links but originated {originated}",
                beacon.outbound_count()
            )));
        }

        if beacon.is_linked_to(location) {
            violations.push(InvariantViolation::new(format!(
                "beacon at {location} is linked to itself"
            )));
        }

        let resonators = beacon.resonators().count();
        if resonators > config.max_resonators {
            violations.push(InvariantViolation::new(format!(
                "beacon at {location} holds {resonators} resonators > cap {}",
                config.max_resonators
            )));
        }
        let mods = beacon.mods().count();
        if mods > config.max_mods {
            violations.push(InvariantViolation::new(format!(
                "beacon at {location} holds {mods} mods > cap {}",
                config.max_mods
            )));
        }
    }
}

fn check_links(registry: &Registry, violations: &mut Vec<InvariantViolation>) {
    for beacon in registry.beacons() {
        let location = beacon.location();
        for &other in beacon.links() {
            let symmetric = registry
                .beacon(other)
                .is_some_and(|neighbour| neighbour.is_linked_to(location));
            if !symmetric {
                violations.push(InvariantViolation::new(format!(
                    "beacon at {location} lists {other} but not the reverse"
                )));
            }
            if registry.link(location, other).is_none() {
                violations.push(InvariantViolation::new(format!(
                    "beacons {location} and {other} are adjacent without a link record"
                )));
            }
        }
    }

    for link in registry.links() {
        if !registry.is_link_resolved(link) {
            let (a, b) = link.endpoints();
            violations.push(InvariantViolation::new(format!(
                "link {a} - {b} is not recorded by both endpoints"
            )));
        }
    }
}

fn check_fields(registry: &Registry, violations: &mut Vec<InvariantViolation>) {
    for field in registry.fields() {
        let Some(team) = field.owner() else {
            violations.push(InvariantViolation::new(format!(
                "field {:?} is live without an owner",
                field.vertices()
            )));
            continue;
        };
        for vertex in field.vertices() {
            let owned = registry
                .beacon(vertex)
                .is_some_and(|beacon| beacon.is_owned_by(team));
            if !owned {
                violations.push(InvariantViolation::new(format!(
                    "field {:?} of {team} has vertex {vertex} not owned by {team}",
                    field.vertices()
                )));
            }
        }
    }
}

fn check_scores(registry: &Registry, violations: &mut Vec<InvariantViolation>) {
    let mut owned_area: BTreeMap<TeamId, i64> = BTreeMap::new();
    for field in registry.fields() {
        if let Some(team) = field.owner() {
            *owned_area.entry(team).or_insert(0) += field.area();
        }
    }

    for (team, score) in registry.ledger().iter() {
        if score < 0 {
            violations.push(InvariantViolation::new(format!(
                "{team} has negative score {score}"
            )));
        }
        let expected = owned_area.get(&team).copied().unwrap_or(0);
        if score != expected {
            violations.push(InvariantViolation::new(format!(
                "{team} scores {score} but owns {expected} area"
            )));
        }
    }

    for (team, area) in owned_area {
        if !registry.ledger().has_entry(team) {
            violations.push(InvariantViolation::new(format!(
                "{team} owns {area} area but has no ledger entry"
            )));
        }
    }
}
