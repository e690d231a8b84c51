//! State hashing for determinism verification.
//!
//! Two registries that went through the same operations must hash the same.
//! A registry restored from its own snapshot hashes the same as the original
//! only when the replay re-derives the same fields: a field whose interior
//! gained an enemy beacon after it was made (an enemy capturing an unowned
//! beacon inside it) is rejected on replay, so fields and scores differ.
//! Timestamps (ticks) are left out so a replay at a different clock still
//! matches.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::beacon::Beacon;
use crate::registry::Registry;

/// Compute a deterministic hash of registry state.
///
/// This hash includes:
/// - Every beacon: location, height, owner, links and artifacts
/// - Every link: endpoints and origin
/// - Every field: vertices, owner and area
/// - Every non-zero ledger entry
#[must_use]
pub fn hash_registry(registry: &Registry) -> u64 {
    let mut hasher = DefaultHasher::new();

    registry.beacon_count().hash(&mut hasher);
    for beacon in registry.beacons() {
        hash_beacon(beacon, &mut hasher);
    }

    registry.link_count().hash(&mut hasher);
    for link in registry.links() {
        link.endpoints().hash(&mut hasher);
        link.origin().hash(&mut hasher);
    }

    registry.field_count().hash(&mut hasher);
    for field in registry.fields() {
        field.key().hash(&mut hasher);
        field.owner().hash(&mut hasher);
        field.area().hash(&mut hasher);
    }

    // A zero entry and a missing entry read the same.
    for (team, score) in registry.ledger().iter().filter(|(_, score)| *score != 0) {
        team.hash(&mut hasher);
        score.hash(&mut hasher);
    }

    hasher.finish()
}

fn hash_beacon<H: Hasher>(beacon: &Beacon, hasher: &mut H) {
    beacon.location().hash(hasher);
    beacon.height().hash(hasher);
    beacon.owner().hash(hasher);
    beacon.outbound_count().hash(hasher);

    beacon.link_count().hash(hasher);
    for link in beacon.links() {
        link.hash(hasher);
    }

    beacon.artifacts().hash(hasher);
}
