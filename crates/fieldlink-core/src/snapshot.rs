//! Persistence snapshot of the beacon set.
//!
//! A snapshot lists beacons and the links each one originated. Fields and
//! scores are not stored: loading registers every beacon, then replays every
//! link in its original direction, and triangle discovery re-derives the
//! fields. The types derive serde and pick no format; hosts choose one.
//!
//! Replay validates each triangle against the beacons as loaded. A live
//! field that an enemy beacon came to sit inside (by capture of an unowned
//! beacon) is therefore not re-derived, and the restored scores are lower.
//!
//! Artifacts ride along with their beacon and are omitted from the output
//! when a beacon has none.

use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::beacon::{Artifact, Location, TeamId};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// Target of a persisted outbound link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    /// X coordinate
    pub x: i32,
    /// Z coordinate
    pub z: i32,
}

impl From<Location> for LinkTarget {
    fn from(location: Location) -> Self {
        Self {
            x: location.x,
            z: location.z,
        }
    }
}

impl From<LinkTarget> for Location {
    fn from(target: LinkTarget) -> Self {
        Self::new(target.x, target.z)
    }
}

/// One persisted beacon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconRecord {
    /// X coordinate
    pub x: i32,
    /// Vertical position, carried for the world map
    pub height: i32,
    /// Z coordinate
    pub z: i32,
    /// Owning team
    pub owner: Option<TeamId>,
    /// Links this beacon originated, in creation order
    pub links: Vec<LinkTarget>,
    /// Deployed resonators and mods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

impl BeaconRecord {
    /// Location of the beacon.
    #[must_use]
    pub const fn location(&self) -> Location {
        Location::new(self.x, self.z)
    }
}

/// Ordered list of beacon records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Beacons in location order
    pub beacons: Vec<BeaconRecord>,
}

impl RegistrySnapshot {
    /// Number of persisted beacons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    /// Returns `true` if no beacon is persisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    /// Total number of persisted links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.beacons.iter().map(|record| record.links.len()).sum()
    }
}

impl Registry {
    /// Captures the beacons and their outbound links.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let beacons = self
            .beacons()
            .map(|beacon| {
                let location = beacon.location();
                let mut outbound: Vec<_> = self
                    .links()
                    .filter(|link| link.origin() == location)
                    .map(|link| (link.created_at(), link.target()))
                    .collect();
                outbound.sort_unstable();

                BeaconRecord {
                    x: location.x,
                    height: beacon.height(),
                    z: location.z,
                    owner: beacon.owner(),
                    links: outbound.into_iter().map(|(_, target)| target.into()).collect(),
                    artifacts: beacon.artifacts().to_vec(),
                }
            })
            .collect();

        RegistrySnapshot { beacons }
    }

    /// Rebuilds a registry from a snapshot.
    ///
    /// Every beacon is registered (with its artifacts) before any link is
    /// replayed. Links replay in record order, which re-derives the fields
    /// and scores. Events produced by the replay are discarded.
    ///
    /// # Errors
    ///
    /// Any registration or link error from the replay, or
    /// [`RegistryError::CorruptSnapshot`] if a beacon persists more links
    /// than `config` allows.
    pub fn from_snapshot(snapshot: &RegistrySnapshot, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);

        for record in &snapshot.beacons {
            let location =
                registry.register_beacon(record.location(), record.height, record.owner)?;
            for artifact in &record.artifacts {
                registry.deploy_artifact(location, *artifact)?;
            }
        }

        for record in &snapshot.beacons {
            let source = record.location();
            for &target in &record.links {
                let outcome = registry.add_outbound_link(source, target.into())?;
                if outcome.rejected_capacity {
                    return Err(RegistryError::CorruptSnapshot(format!(
                        "beacon at {source} persists more than {} outbound links",
                        config.max_outbound_links
                    )));
                }
            }
        }

        registry.take_events();
        debug!(
            beacons = registry.beacon_count(),
            links = registry.link_count(),
            fields = registry.field_count(),
            "registry restored from snapshot"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beacon::{Mod, ModKind, PlayerId};

    const RED: TeamId = TeamId::new(1);

    fn loc(x: i32, z: i32) -> Location {
        Location::new(x, z)
    }

    fn triangle_registry() -> Registry {
        let mut registry = Registry::new();
        for (x, z) in [(0, 0), (100, 0), (0, 100)] {
            registry.register_beacon(loc(x, z), 64, Some(RED)).unwrap();
        }
        registry.register_beacon(loc(500, 500), 70, None).unwrap();
        registry.add_outbound_link(loc(0, 0), loc(100, 0)).unwrap();
        registry.add_outbound_link(loc(100, 0), loc(0, 100)).unwrap();
        registry.add_outbound_link(loc(0, 100), loc(0, 0)).unwrap();
        registry
    }

    #[test]
    fn snapshot_lists_outbound_links_only() {
        let snapshot = triangle_registry().snapshot();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.link_count(), 3);
        let origin = snapshot
            .beacons
            .iter()
            .find(|record| record.location() == loc(0, 0))
            .unwrap();
        assert_eq!(origin.links, vec![LinkTarget { x: 100, z: 0 }]);
    }

    #[test]
    fn replay_rederives_fields_and_scores() {
        let original = triangle_registry();
        let restored = Registry::from_snapshot(&original.snapshot(), RegistryConfig::default())
            .unwrap();

        assert_eq!(restored.field_count(), 1);
        assert_eq!(restored.score(RED), 5000);
        assert_eq!(restored.link_count(), 3);
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn replay_preserves_link_direction() {
        let restored =
            Registry::from_snapshot(&triangle_registry().snapshot(), RegistryConfig::default())
                .unwrap();
        let link = restored.link(loc(0, 0), loc(100, 0)).unwrap();
        assert_eq!(link.origin(), loc(0, 0));
        assert_eq!(restored.beacon(loc(0, 0)).unwrap().outbound_count(), 1);
    }

    #[test]
    fn replay_discards_events() {
        let mut restored =
            Registry::from_snapshot(&triangle_registry().snapshot(), RegistryConfig::default())
                .unwrap();
        assert!(restored.take_events().is_empty());
    }

    #[test]
    fn artifacts_survive_and_are_optional_in_json() {
        let mut registry = Registry::new();
        registry.register_beacon(loc(0, 0), 64, Some(RED)).unwrap();
        registry.register_beacon(loc(5, 5), 64, None).unwrap();
        registry
            .deploy_artifact(loc(0, 0), Mod::new(PlayerId::new(3), ModKind::LinkAmp).into())
            .unwrap();

        let json = serde_json::to_string(&registry.snapshot()).unwrap();
        assert_eq!(json.matches("artifacts").count(), 1);

        let parsed: RegistrySnapshot = serde_json::from_str(&json).unwrap();
        let restored = Registry::from_snapshot(&parsed, RegistryConfig::default()).unwrap();
        assert_eq!(restored.beacon(loc(0, 0)).unwrap().mods().count(), 1);
    }

    #[test]
    fn too_many_persisted_links_is_corrupt() {
        let mut registry = Registry::new();
        let hub = registry.register_beacon(loc(0, 0), 64, Some(RED)).unwrap();
        for i in 1..=3 {
            let spoke = registry.register_beacon(loc(i * 10, 1000), 64, Some(RED)).unwrap();
            registry.add_outbound_link(hub, spoke).unwrap();
        }

        let result =
            Registry::from_snapshot(&registry.snapshot(), RegistryConfig::with_max_outbound_links(2));
        assert!(matches!(result, Err(RegistryError::CorruptSnapshot(_))));
    }

    #[test]
    fn link_to_missing_beacon_fails() {
        let snapshot = RegistrySnapshot {
            beacons: vec![BeaconRecord {
                x: 0,
                height: 64,
                z: 0,
                owner: Some(RED),
                links: vec![LinkTarget { x: 9, z: 9 }],
                artifacts: Vec::new(),
            }],
        };
        assert_eq!(
            Registry::from_snapshot(&snapshot, RegistryConfig::default()).unwrap_err(),
            RegistryError::UnknownBeacon(loc(9, 9))
        );
    }
}
