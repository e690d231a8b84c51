//! Beacons: the capturable nodes of the link graph.
//!
//! This module provides:
//! - [`Location`]: the immutable 2D map key of a beacon
//! - [`TeamId`] and [`PlayerId`]: ownership and placement identifiers
//! - [`Beacon`]: a node with an owner, an adjacency set and artifact slots
//!
//! # Architecture
//!
//! Beacons never hold references to each other. A beacon's links are a set
//! of [`Location`] keys into the registry, so the graph can be cyclic without
//! any ownership cycles, and a snapshot is just the key sets.
//!
//! Mutation goes through [`crate::registry::Registry`]: the methods that
//! touch links, ownership or artifacts are crate-private so the registry can
//! keep the score ledger in step with them.
//!
//! # Example
//!
//! ```
//! use fieldlink_core::beacon::{Location, TeamId};
//! use fieldlink_core::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let here = registry.register_beacon(Location::new(10, 20), 64, Some(TeamId::new(1)))?;
//!
//! let beacon = registry.beacon(here).unwrap();
//! assert_eq!(beacon.owner(), Some(TeamId::new(1)));
//! assert_eq!(beacon.outbound_count(), 0);
//! # Ok::<(), fieldlink_core::RegistryError>(())
//! ```

pub mod artifact;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use tri2d::Point;

use crate::config::RegistryConfig;
use crate::error::BeaconError;

pub use artifact::{Artifact, ArtifactKind, Mod, ModKind, Resonator};

/// 2D map location of a beacon: world `x` and `z`.
///
/// Locations are the beacon's identity in the registry. Ordering is by `x`
/// then `z`, which gives the registry a deterministic iteration order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// World x coordinate
    pub x: i32,
    /// World z coordinate
    pub z: i32,
}

impl Location {
    /// Creates a location from world coordinates.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns this location as a planar point (`z` becomes `y`).
    #[must_use]
    pub const fn to_point(self) -> Point {
        Point::new(self.x, self.z)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({}, {})", self.x, self.z)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl From<(i32, i32)> for Location {
    fn from((x, z): (i32, i32)) -> Self {
        Self::new(x, z)
    }
}

impl From<Location> for Point {
    fn from(location: Location) -> Self {
        location.to_point()
    }
}

/// Identifier of a team, the unit of ownership and scoring.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(u16);

impl TeamId {
    /// Creates a team identifier.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

impl From<u16> for TeamId {
    fn from(id: u16) -> Self {
        Self::new(id)
    }
}

/// Identifier of a player who places artifacts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Creates a player identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// A capturable node at a fixed map location.
///
/// # Invariants
///
/// - `location` never changes; it is the registry key
/// - `outbound_count` never exceeds the configured cap
/// - `links` never contains `location`
/// - resonator and mod counts never exceed their caps
///
/// Links are recorded on both endpoints once a link resolves, but only the
/// originating endpoint spends an outbound slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    location: Location,
    height: i32,
    owner: Option<TeamId>,
    captured_at: Option<u64>,
    fresh: bool,
    map_id: Option<u64>,
    links: BTreeSet<Location>,
    outbound_count: u8,
    artifacts: Vec<Artifact>,
}

impl Beacon {
    /// Creates a newly placed beacon with no links or artifacts.
    #[must_use]
    pub fn new(location: Location, height: i32, owner: Option<TeamId>) -> Self {
        Self {
            location,
            height,
            owner,
            captured_at: None,
            fresh: true,
            map_id: None,
            links: BTreeSet::new(),
            outbound_count: 0,
            artifacts: Vec::new(),
        }
    }

    /// Returns the beacon's map location.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Returns the beacon's world height.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Returns the owning team, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<TeamId> {
        self.owner
    }

    /// Returns `true` if some team owns this beacon.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns `true` if `team` owns this beacon.
    #[must_use]
    pub fn is_owned_by(&self, team: TeamId) -> bool {
        self.owner == Some(team)
    }

    /// Tick at which the current owner took the beacon.
    #[must_use]
    pub const fn captured_at(&self) -> Option<u64> {
        self.captured_at
    }

    /// Returns `true` until the beacon is first captured.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Map-association id, if one has been assigned.
    #[must_use]
    pub const fn map_id(&self) -> Option<u64> {
        self.map_id
    }

    /// Locations this beacon is linked to, in either direction.
    #[must_use]
    pub fn links(&self) -> &BTreeSet<Location> {
        &self.links
    }

    /// Returns `true` if a link to `other` is recorded here.
    #[must_use]
    pub fn is_linked_to(&self, other: Location) -> bool {
        self.links.contains(&other)
    }

    /// Number of linked beacons.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of links this beacon originated.
    #[must_use]
    pub const fn outbound_count(&self) -> u8 {
        self.outbound_count
    }

    /// All deployed artifacts in slot order.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Deployed resonators.
    pub fn resonators(&self) -> impl Iterator<Item = &Resonator> + '_ {
        self.artifacts.iter().filter_map(Artifact::as_resonator)
    }

    /// Installed mods.
    pub fn mods(&self) -> impl Iterator<Item = &Mod> + '_ {
        self.artifacts.iter().filter_map(Artifact::as_mod)
    }

    // -------------------------------------------------------------------------
    // Registry-only mutation
    // -------------------------------------------------------------------------

    /// Records an outbound link and spends a slot. Returns `false` if the
    /// link was already recorded.
    pub(crate) fn insert_outbound(&mut self, destination: Location) -> bool {
        if destination == self.location || !self.links.insert(destination) {
            return false;
        }
        self.outbound_count += 1;
        true
    }

    /// Records the far end of a link originated elsewhere. No slot is spent.
    pub(crate) fn insert_backlink(&mut self, starter: Location) -> bool {
        starter != self.location && self.links.insert(starter)
    }

    /// Forgets a link. `originated_here` returns the outbound slot.
    pub(crate) fn remove_link(&mut self, other: Location, originated_here: bool) -> bool {
        let removed = self.links.remove(&other);
        if removed && originated_here {
            self.outbound_count = self.outbound_count.saturating_sub(1);
        }
        removed
    }

    /// Drops every link and resets the outbound counter.
    pub(crate) fn take_links(&mut self) -> BTreeSet<Location> {
        self.outbound_count = 0;
        std::mem::take(&mut self.links)
    }

    pub(crate) fn capture(&mut self, team: TeamId, tick: u64) {
        self.owner = Some(team);
        self.captured_at = Some(tick);
        self.fresh = false;
    }

    pub(crate) fn clear_owner(&mut self) -> Option<TeamId> {
        self.captured_at = None;
        self.owner.take()
    }

    pub(crate) fn set_map_id(&mut self, id: u64) {
        debug_assert!(self.map_id.is_none(), "map id is assigned at most once");
        self.map_id = Some(id);
    }

    /// Places an artifact in the next free slot and returns its slot index.
    pub(crate) fn attach(
        &mut self,
        artifact: Artifact,
        config: &RegistryConfig,
    ) -> Result<usize, BeaconError> {
        match artifact {
            Artifact::Resonator(r) => {
                if r.level == 0 || r.level > config.max_resonator_level {
                    return Err(BeaconError::InvalidResonatorLevel {
                        level: r.level,
                        max: config.max_resonator_level,
                    });
                }
                if self.resonators().count() >= config.max_resonators {
                    return Err(BeaconError::ResonatorsFull {
                        max: config.max_resonators,
                    });
                }
            }
            Artifact::Mod(m) => {
                if self.mods().count() >= config.max_mods {
                    return Err(BeaconError::ModsFull {
                        max: config.max_mods,
                    });
                }
                let by_placer = self.mods().filter(|existing| existing.placer == m.placer).count();
                if by_placer >= config.max_mods_per_placer {
                    return Err(BeaconError::PlacerModLimit {
                        placer: m.placer,
                        max: config.max_mods_per_placer,
                    });
                }
            }
        }

        self.artifacts.push(artifact);
        Ok(self.artifacts.len() - 1)
    }

    pub(crate) fn detach(&mut self, slot: usize) -> Result<Artifact, BeaconError> {
        if slot >= self.artifacts.len() {
            return Err(BeaconError::NoSuchArtifact { slot });
        }
        Ok(self.artifacts.remove(slot))
    }

    pub(crate) fn strip_artifacts(&mut self) -> Vec<Artifact> {
        std::mem::take(&mut self.artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_beacon() -> Beacon {
        Beacon::new(Location::new(0, 0), 64, Some(TeamId::new(1)))
    }

    mod location_tests {
        use super::*;

        #[test]
        fn ordering_is_x_then_z() {
            let mut locations = vec![
                Location::new(1, 0),
                Location::new(0, 5),
                Location::new(0, -5),
            ];
            locations.sort();
            assert_eq!(
                locations,
                vec![Location::new(0, -5), Location::new(0, 5), Location::new(1, 0)]
            );
        }

        #[test]
        fn converts_to_point() {
            assert_eq!(Location::new(3, 7).to_point(), Point::new(3, 7));
            assert_eq!(Point::from(Location::new(-1, 2)), Point::new(-1, 2));
        }

        #[test]
        fn display_and_debug() {
            let loc = Location::new(4, -2);
            assert_eq!(format!("{loc}"), "(4, -2)");
            assert_eq!(format!("{loc:?}"), "Location(4, -2)");
        }
    }

    mod link_tests {
        use super::*;

        #[test]
        fn outbound_spends_a_slot() {
            let mut beacon = owned_beacon();
            assert!(beacon.insert_outbound(Location::new(10, 0)));
            assert_eq!(beacon.outbound_count(), 1);
            assert!(beacon.is_linked_to(Location::new(10, 0)));
        }

        #[test]
        fn duplicate_outbound_is_noop() {
            let mut beacon = owned_beacon();
            beacon.insert_outbound(Location::new(10, 0));
            assert!(!beacon.insert_outbound(Location::new(10, 0)));
            assert_eq!(beacon.outbound_count(), 1);
        }

        #[test]
        fn self_link_is_refused() {
            let mut beacon = owned_beacon();
            assert!(!beacon.insert_outbound(Location::new(0, 0)));
            assert!(!beacon.insert_backlink(Location::new(0, 0)));
            assert_eq!(beacon.link_count(), 0);
        }

        #[test]
        fn backlink_does_not_spend_a_slot() {
            let mut beacon = owned_beacon();
            assert!(beacon.insert_backlink(Location::new(5, 5)));
            assert!(!beacon.insert_backlink(Location::new(5, 5)));
            assert_eq!(beacon.outbound_count(), 0);
            assert_eq!(beacon.link_count(), 1);
        }

        #[test]
        fn remove_link_returns_slot_only_for_origin() {
            let mut beacon = owned_beacon();
            beacon.insert_outbound(Location::new(1, 0));
            beacon.insert_backlink(Location::new(2, 0));

            assert!(beacon.remove_link(Location::new(2, 0), false));
            assert_eq!(beacon.outbound_count(), 1);

            assert!(beacon.remove_link(Location::new(1, 0), true));
            assert_eq!(beacon.outbound_count(), 0);
            assert!(!beacon.remove_link(Location::new(1, 0), true));
        }

        #[test]
        fn take_links_resets_counter() {
            let mut beacon = owned_beacon();
            beacon.insert_outbound(Location::new(1, 0));
            beacon.insert_outbound(Location::new(2, 0));
            let taken = beacon.take_links();
            assert_eq!(taken.len(), 2);
            assert_eq!(beacon.outbound_count(), 0);
            assert_eq!(beacon.link_count(), 0);
        }
    }

    mod ownership_tests {
        use super::*;

        #[test]
        fn new_beacon_is_fresh() {
            let beacon = Beacon::new(Location::new(0, 0), 70, None);
            assert!(beacon.is_fresh());
            assert!(!beacon.is_owned());
            assert_eq!(beacon.height(), 70);
        }

        #[test]
        fn capture_sets_owner_and_tick() {
            let mut beacon = Beacon::new(Location::new(0, 0), 70, None);
            beacon.capture(TeamId::new(2), 15);
            assert!(beacon.is_owned_by(TeamId::new(2)));
            assert_eq!(beacon.captured_at(), Some(15));
            assert!(!beacon.is_fresh());
        }

        #[test]
        fn clear_owner_returns_previous() {
            let mut beacon = owned_beacon();
            assert_eq!(beacon.clear_owner(), Some(TeamId::new(1)));
            assert_eq!(beacon.owner(), None);
            assert_eq!(beacon.clear_owner(), None);
        }
    }

    mod artifact_tests {
        use super::*;

        #[test]
        fn resonator_cap_is_nine() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            for i in 0..9 {
                let slot = beacon
                    .attach(Resonator::new(PlayerId::new(i), 1).into(), &config)
                    .unwrap();
                assert_eq!(slot, usize::try_from(i).unwrap());
            }
            let err = beacon
                .attach(Resonator::new(PlayerId::new(99), 1).into(), &config)
                .unwrap_err();
            assert_eq!(err, BeaconError::ResonatorsFull { max: 9 });
            assert_eq!(beacon.resonators().count(), 9);
        }

        #[test]
        fn resonator_level_is_validated() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            assert!(beacon
                .attach(Resonator::new(PlayerId::new(1), 0).into(), &config)
                .is_err());
            assert_eq!(
                beacon.attach(Resonator::new(PlayerId::new(1), 9).into(), &config),
                Err(BeaconError::InvalidResonatorLevel { level: 9, max: 8 })
            );
            assert!(beacon
                .attach(Resonator::new(PlayerId::new(1), 8).into(), &config)
                .is_ok());
        }

        #[test]
        fn two_mods_per_placer() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            let alice = PlayerId::new(1);
            beacon.attach(Mod::new(alice, ModKind::Shield).into(), &config).unwrap();
            beacon.attach(Mod::new(alice, ModKind::Turret).into(), &config).unwrap();
            assert_eq!(
                beacon.attach(Mod::new(alice, ModKind::HeatSink).into(), &config),
                Err(BeaconError::PlacerModLimit { placer: alice, max: 2 })
            );
        }

        #[test]
        fn four_mods_total() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            for player in 1..=4 {
                beacon
                    .attach(Mod::new(PlayerId::new(player), ModKind::LinkAmp).into(), &config)
                    .unwrap();
            }
            assert_eq!(
                beacon.attach(Mod::new(PlayerId::new(5), ModKind::Shield).into(), &config),
                Err(BeaconError::ModsFull { max: 4 })
            );
            assert_eq!(beacon.mods().count(), 4);
        }

        #[test]
        fn resonators_and_mods_have_separate_caps() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            for i in 0..9 {
                beacon
                    .attach(Resonator::new(PlayerId::new(i), 4).into(), &config)
                    .unwrap();
            }
            assert!(beacon
                .attach(Mod::new(PlayerId::new(1), ModKind::ForceAmp).into(), &config)
                .is_ok());
        }

        #[test]
        fn detach_by_slot() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            beacon.attach(Resonator::new(PlayerId::new(1), 2).into(), &config).unwrap();
            beacon.attach(Mod::new(PlayerId::new(1), ModKind::MultiHack).into(), &config).unwrap();

            let removed = beacon.detach(0).unwrap();
            assert!(removed.is_resonator());
            assert_eq!(beacon.artifacts().len(), 1);
            assert_eq!(beacon.detach(5), Err(BeaconError::NoSuchArtifact { slot: 5 }));
        }

        #[test]
        fn strip_removes_everything() {
            let config = RegistryConfig::default();
            let mut beacon = owned_beacon();
            beacon.attach(Resonator::new(PlayerId::new(1), 2).into(), &config).unwrap();
            assert_eq!(beacon.strip_artifacts().len(), 1);
            assert!(beacon.artifacts().is_empty());
        }
    }

    #[test]
    fn beacon_is_serializable() {
        let mut beacon = owned_beacon();
        beacon.insert_outbound(Location::new(3, 3));
        let json = serde_json::to_string(&beacon).unwrap();
        let back: Beacon = serde_json::from_str(&json).unwrap();
        assert_eq!(beacon, back);
    }
}
