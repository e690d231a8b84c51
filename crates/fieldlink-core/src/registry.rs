//! The registry: aggregate root of the field engine.
//!
//! The registry owns every beacon, link, field and score. It provides:
//! - Beacon storage keyed by [`Location`] with deterministic iteration
//!   (`BTreeMap`)
//! - The link protocol: outbound slot, backlink, triangle discovery
//! - Triangle validation and the field set (the only deduplication point)
//! - The score ledger, written in lock-step with the field set
//! - Teardown cascades when a beacon is released or deleted
//!
//! # Atomicity
//!
//! Every public method takes `&mut self` and finishes before returning.
//! Multi-step operations check all of their preconditions first, including
//! every triangle a new link would close, so an `Err` always means nothing
//! changed. A host that shares a registry between threads must put the
//! whole registry behind one lock.
//!
//! # Score invariant
//!
//! After every public method returns, for every team:
//!
//! ```text
//! score(team) == sum(field.area() for field in fields if field.owner() == Some(team))
//! ```
//!
//! [`crate::invariants::audit`] checks this and the other structural
//! invariants.
//!
//! # Example
//!
//! ```
//! use fieldlink_core::beacon::{Location, TeamId};
//! use fieldlink_core::registry::Registry;
//!
//! let team = TeamId::new(1);
//! let mut registry = Registry::new();
//!
//! let a = registry.register_beacon(Location::new(0, 0), 64, Some(team))?;
//! let b = registry.register_beacon(Location::new(100, 0), 64, Some(team))?;
//! let c = registry.register_beacon(Location::new(0, 100), 64, Some(team))?;
//!
//! registry.add_outbound_link(a, b)?;
//! registry.add_outbound_link(b, c)?;
//! let outcome = registry.add_outbound_link(c, a)?;
//!
//! assert_eq!(outcome.fields_created().count(), 1);
//! assert_eq!(registry.score(team), 5000);
//! # Ok::<(), fieldlink_core::RegistryError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::beacon::{Artifact, Beacon, Location, TeamId};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::event::{EventLog, FieldEvent};
use crate::field::TriangleField;
use crate::ledger::ScoreLedger;
use crate::link::{common_owner, Link, LinkLine};
use crate::outcome::{LinkOutcome, ReleaseOutcome, TriangleOutcome};

/// A candidate triangle after validation, before commit.
enum Candidate {
    Accept(TriangleField),
    Reject(TriangleOutcome),
}

/// Aggregate root owning beacons, links, fields and scores.
///
/// One registry is one game session. Construct it explicitly and pass it to
/// whatever orchestrates the session; there is no global instance.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Limits applied to links and artifacts.
    config: RegistryConfig,
    /// Beacons by location.
    beacons: BTreeMap<Location, Beacon>,
    /// Link records by normalized endpoint pair.
    links: BTreeMap<(Location, Location), Link>,
    /// Directed link lines per team, for renderers only.
    link_lines: BTreeMap<TeamId, BTreeSet<LinkLine>>,
    /// Every live field. Insertion is the deduplication point.
    fields: BTreeSet<TriangleField>,
    /// Score per team.
    ledger: ScoreLedger,
    /// Current game tick, used for timestamps.
    tick: u64,
    /// Next map-association id to hand out.
    next_map_id: u64,
    /// Change notifications not yet drained.
    events: EventLog,
}

impl Registry {
    /// Creates an empty registry with the default game rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with custom limits.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            beacons: BTreeMap::new(),
            links: BTreeMap::new(),
            link_lines: BTreeMap::new(),
            fields: BTreeSet::new(),
            ledger: ScoreLedger::new(),
            tick: 0,
            next_map_id: 0,
            events: EventLog::new(),
        }
    }

    /// The limits this registry enforces.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the current tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick used for link, field and capture timestamps.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    // =========================================================================
    // Beacons
    // =========================================================================

    /// Registers a beacon and returns its handle (the location).
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateBeacon`] if the location is taken.
    pub fn register_beacon(
        &mut self,
        location: Location,
        height: i32,
        owner: Option<TeamId>,
    ) -> Result<Location> {
        if self.beacons.contains_key(&location) {
            return Err(RegistryError::DuplicateBeacon(location));
        }

        let mut beacon = Beacon::new(location, height, None);
        if let Some(team) = owner {
            beacon.capture(team, self.tick);
        }
        self.beacons.insert(location, beacon);
        debug!(%location, height, owner = ?owner, "beacon registered");
        Ok(location)
    }

    /// Returns the beacon at `location`.
    #[must_use]
    pub fn beacon(&self, location: Location) -> Option<&Beacon> {
        self.beacons.get(&location)
    }

    /// Returns `true` if a beacon is registered at `location`.
    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        self.beacons.contains_key(&location)
    }

    /// Iterates beacons in location order.
    pub fn beacons(&self) -> impl Iterator<Item = &Beacon> + '_ {
        self.beacons.values()
    }

    /// Number of registered beacons.
    #[must_use]
    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }

    /// Returns `true` if no beacon is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    /// Returns the beacon's map-association id, assigning one on first use.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownBeacon`] if nothing is registered there.
    pub fn map_id(&mut self, location: Location) -> Result<u64> {
        let beacon = self
            .beacons
            .get_mut(&location)
            .ok_or(RegistryError::UnknownBeacon(location))?;

        if let Some(id) = beacon.map_id() {
            return Ok(id);
        }
        let id = self.next_map_id;
        beacon.set_map_id(id);
        self.next_map_id += 1;
        Ok(id)
    }

    /// Gives the beacon to `team`.
    ///
    /// An enemy-held beacon is released first, with the full teardown
    /// cascade; that release is returned. Capturing a beacon the team
    /// already holds changes nothing.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownBeacon`] if nothing is registered there.
    pub fn capture_beacon(
        &mut self,
        location: Location,
        team: TeamId,
    ) -> Result<Option<ReleaseOutcome>> {
        let current = self.beacon_ref(location)?.owner();
        let released = match current {
            Some(owner) if owner == team => return Ok(None),
            Some(_) => Some(self.release_beacon(location)?),
            None => None,
        };

        let tick = self.tick;
        self.beacon_mut(location)?.capture(team, tick);
        self.events.record(FieldEvent::BeaconCaptured { location, team });
        info!(%location, %team, "beacon captured");
        Ok(released)
    }

    /// Deploys a resonator or mod and returns its slot.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownBeacon`], [`RegistryError::Unowned`], or a
    /// wrapped [`crate::error::BeaconError`] when a cap is hit.
    pub fn deploy_artifact(&mut self, location: Location, artifact: Artifact) -> Result<usize> {
        let config = self.config;
        let beacon = self.beacon_mut(location)?;
        if !beacon.is_owned() {
            return Err(RegistryError::Unowned(location));
        }
        let slot = beacon.attach(artifact, &config)?;
        debug!(%location, slot, kind = %artifact.kind(), placer = %artifact.placer(), "artifact deployed");
        Ok(slot)
    }

    /// Removes the artifact in `slot`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownBeacon`] or
    /// [`crate::error::BeaconError::NoSuchArtifact`].
    pub fn remove_artifact(&mut self, location: Location, slot: usize) -> Result<Artifact> {
        Ok(self.beacon_mut(location)?.detach(slot)?)
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Links `source` to `destination`, spending one of the source's
    /// outbound slots, and creates every field the link closes.
    ///
    /// The destination records the backlink without spending a slot. When
    /// the backlink is new, every beacon `mid` linked to both ends closes a
    /// candidate triangle `(source, destination, mid)`; each is validated
    /// and offered to the field set.
    ///
    /// A source with no free slot gets [`LinkOutcome::capacity_rejected`].
    /// An existing link gets [`LinkOutcome::unchanged`]. Neither changes
    /// anything.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::SelfLink`] if both ends are the same
    /// - [`RegistryError::UnknownBeacon`] if either end is unregistered
    /// - [`RegistryError::Unowned`] if the source has no owner
    /// - [`RegistryError::OwnerMismatch`] if the destination is not the
    ///   source's team, or a closed triangle has a vertex of another team
    pub fn add_outbound_link(
        &mut self,
        source: Location,
        destination: Location,
    ) -> Result<LinkOutcome> {
        if source == destination {
            return Err(RegistryError::SelfLink(source));
        }
        let src = self.beacon_ref(source)?;
        let dst = self.beacon_ref(destination)?;
        let team = src.owner().ok_or(RegistryError::Unowned(source))?;
        if !dst.is_owned_by(team) {
            return Err(RegistryError::OwnerMismatch {
                location: destination,
                expected: team,
                actual: dst.owner(),
            });
        }

        if src.outbound_count() >= self.config.max_outbound_links {
            warn!(%source, %destination, max = self.config.max_outbound_links, "outbound link cap reached");
            return Ok(LinkOutcome::capacity_rejected());
        }
        if src.is_linked_to(destination) {
            debug!(%source, %destination, "link already present");
            return Ok(LinkOutcome::unchanged());
        }

        // Validate everything the link will close before touching state.
        let candidates = self
            .closing_mids(source, destination)
            .into_iter()
            .map(|mid| self.evaluate_triangle([source, destination, mid], team))
            .collect::<Result<Vec<_>>>()?;

        let tick = self.tick;
        self.beacon_mut(source)?.insert_outbound(destination);
        self.links
            .insert(Link::key(source, destination), Link::new(source, destination, tick));
        self.link_lines
            .entry(team)
            .or_default()
            .insert(LinkLine::new(source, destination));
        self.events.record(FieldEvent::LinkCreated {
            origin: source,
            target: destination,
            team,
        });
        debug!(%source, %destination, %team, "link created");

        let reciprocated = self.beacon_mut(destination)?.insert_backlink(source);
        let mut fields_formed = Vec::new();
        if reciprocated {
            for candidate in candidates {
                fields_formed.push(match candidate {
                    Candidate::Accept(field) => self.commit_field(field),
                    Candidate::Reject(outcome) => outcome,
                });
            }
        }

        Ok(LinkOutcome {
            created: true,
            reciprocated,
            fields_formed,
            rejected_capacity: false,
        })
    }

    /// Beacons that close a 3-cycle `starter -> destination -> mid -> starter`
    /// once `starter` is linked to `destination`.
    fn closing_mids(&self, starter: Location, destination: Location) -> Vec<Location> {
        let Some(dst) = self.beacons.get(&destination) else {
            return Vec::new();
        };

        let mut mids = Vec::new();
        for &mid in dst.links() {
            if mid == destination || mid == starter {
                continue;
            }
            let Some(mid_beacon) = self.beacons.get(&mid) else {
                continue;
            };
            for &far in mid_beacon.links() {
                if far == starter {
                    mids.push(mid);
                }
            }
        }
        mids
    }

    /// Returns the link between `a` and `b`, in either direction.
    #[must_use]
    pub fn link(&self, a: Location, b: Location) -> Option<&Link> {
        self.links.get(&Link::key(a, b))
    }

    /// Iterates links in endpoint order.
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.values()
    }

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// The team both endpoints belong to, if they agree.
    #[must_use]
    pub fn link_owner(&self, link: &Link) -> Option<TeamId> {
        let (a, b) = link.endpoints();
        common_owner(
            self.beacons.get(&a).and_then(Beacon::owner),
            self.beacons.get(&b).and_then(Beacon::owner),
        )
    }

    /// Returns `true` if both endpoints record each other.
    #[must_use]
    pub fn is_link_resolved(&self, link: &Link) -> bool {
        let (a, b) = link.endpoints();
        let records = |from: Location, to: Location| {
            self.beacons
                .get(&from)
                .is_some_and(|beacon| beacon.is_linked_to(to))
        };
        records(a, b) && records(b, a)
    }

    /// Directed link lines drawn for `team`.
    pub fn link_lines(&self, team: TeamId) -> impl Iterator<Item = &LinkLine> + '_ {
        self.link_lines.get(&team).into_iter().flatten()
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Validates the triangle `p1 p2 p3` for `team` and adds it to the field
    /// set if it is new.
    ///
    /// Collinear candidates and candidates with another team's beacon
    /// strictly inside are rejected. Unowned beacons inside do not block a
    /// field. A candidate already in the set is a duplicate and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownBeacon`] if a vertex is unregistered
    /// - [`RegistryError::OwnerMismatch`] if a vertex is not owned by `team`
    pub fn try_create_triangle(
        &mut self,
        p1: Location,
        p2: Location,
        p3: Location,
        team: TeamId,
    ) -> Result<TriangleOutcome> {
        match self.evaluate_triangle([p1, p2, p3], team)? {
            Candidate::Accept(field) => Ok(self.commit_field(field)),
            Candidate::Reject(outcome) => Ok(outcome),
        }
    }

    fn evaluate_triangle(&self, vertices: [Location; 3], team: TeamId) -> Result<Candidate> {
        for vertex in vertices {
            let beacon = self.beacon_ref(vertex)?;
            if !beacon.is_owned_by(team) {
                return Err(RegistryError::OwnerMismatch {
                    location: vertex,
                    expected: team,
                    actual: beacon.owner(),
                });
            }
        }

        let field = TriangleField::new(vertices, Some(team), self.tick);
        if field.is_degenerate() {
            debug!(?vertices, %team, "degenerate triangle rejected");
            return Ok(Candidate::Reject(TriangleOutcome::Degenerate { vertices }));
        }

        // find_first keeps the reported enemy stable across thread counts
        let enemy = self.beacons.par_iter().find_first(|(_, beacon)| {
            beacon.owner().is_some_and(|owner| owner != team) && field.contains(beacon.location())
        });
        if let Some((_, enemy)) = enemy {
            debug!(?vertices, %team, enemy = %enemy.location(), "enemy beacon inside triangle");
            return Ok(Candidate::Reject(TriangleOutcome::EnemyInside {
                vertices,
                enemy: enemy.location(),
            }));
        }

        Ok(Candidate::Accept(field))
    }

    fn commit_field(&mut self, field: TriangleField) -> TriangleOutcome {
        let vertices = field.vertices();
        if !self.fields.insert(field.clone()) {
            debug!(?vertices, "field already exists");
            return TriangleOutcome::Duplicate { vertices };
        }

        if let Some(team) = field.owner() {
            let score = self.ledger.credit(team, field.area());
            self.events.record(FieldEvent::FieldCreated {
                vertices,
                team,
                area: field.area(),
            });
            info!(?vertices, %team, area = field.area(), score, "field created");
        }
        TriangleOutcome::Created { field }
    }

    /// Iterates fields in vertex order.
    pub fn fields(&self) -> impl Iterator<Item = &TriangleField> + '_ {
        self.fields.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields whose interior strictly contains `location`.
    #[must_use]
    pub fn triangles_containing(&self, location: Location) -> Vec<&TriangleField> {
        self.fields
            .iter()
            .filter(|field| field.contains(location))
            .collect()
    }

    /// Fields that use `location` as a vertex.
    #[must_use]
    pub fn fields_with_vertex(&self, location: Location) -> Vec<&TriangleField> {
        self.fields
            .iter()
            .filter(|field| field.has_vertex(location))
            .collect()
    }

    /// Fields whose interior overlaps `field`'s interior.
    #[must_use]
    pub fn overlapping_fields(&self, field: &TriangleField) -> Vec<&TriangleField> {
        self.fields
            .iter()
            .filter(|existing| existing.overlaps(field))
            .collect()
    }

    /// Fields owned by `team`.
    pub fn fields_owned_by(&self, team: TeamId) -> impl Iterator<Item = &TriangleField> + '_ {
        self.fields
            .iter()
            .filter(move |field| field.owner() == Some(team))
    }

    // =========================================================================
    // Scores
    // =========================================================================

    /// Score of `team`; zero if it never scored.
    #[must_use]
    pub fn score(&self, team: TeamId) -> i64 {
        self.ledger.score(team)
    }

    /// The full ledger.
    #[must_use]
    pub const fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Strips a beacon of its owner, links, artifacts and fields.
    ///
    /// In order: the owner is cleared; every neighbour forgets the link
    /// (getting its outbound slot back if it originated the link); the
    /// beacon's own links are cleared; every field with this beacon as a
    /// vertex is removed and its area debited from its owner.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownBeacon`] if nothing is registered there.
    pub fn release_beacon(&mut self, location: Location) -> Result<ReleaseOutcome> {
        let beacon = self.beacon_mut(location)?;
        let previous_owner = beacon.clear_owner();
        let artifacts_stripped = beacon.strip_artifacts().len();
        let neighbours = beacon.take_links();

        for &neighbour in &neighbours {
            let link = self.links.remove(&Link::key(location, neighbour));
            let neighbour_originated = link.is_some_and(|l| l.origin() == neighbour);
            if let Some(other) = self.beacons.get_mut(&neighbour) {
                other.remove_link(location, neighbour_originated);
            }
            if let Some(link) = link {
                self.events.record(FieldEvent::LinkRemoved {
                    origin: link.origin(),
                    target: link.target(),
                });
            }
        }
        if let Some(team) = previous_owner {
            self.remove_lines_touching(team, location);
        }

        let doomed: Vec<TriangleField> = self
            .fields
            .iter()
            .filter(|field| field.has_vertex(location))
            .cloned()
            .collect();

        let mut fields_removed = Vec::with_capacity(doomed.len());
        let mut score_reversed = 0;
        for mut field in doomed {
            self.fields.remove(&field);
            let owner = field.strip();
            if let Some(team) = owner {
                if self.ledger.has_entry(team) {
                    let score = self.ledger.debit(team, field.area());
                    score_reversed += field.area();
                    info!(vertices = ?field.vertices(), %team, area = field.area(), score, "field destroyed");
                }
            }
            self.events.record(FieldEvent::FieldDestroyed {
                vertices: field.vertices(),
                team: owner,
                area: field.area(),
            });
            fields_removed.push(field);
        }

        self.events.record(FieldEvent::BeaconReleased {
            location,
            previous_owner,
        });
        info!(
            %location,
            owner = ?previous_owner,
            links = neighbours.len(),
            fields = fields_removed.len(),
            score_reversed,
            "beacon released"
        );

        Ok(ReleaseOutcome {
            previous_owner,
            unlinked: neighbours.into_iter().collect(),
            fields_removed,
            score_reversed,
            artifacts_stripped,
        })
    }

    /// Releases the beacon and removes it from the registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownBeacon`] if nothing is registered there.
    pub fn delete_beacon(&mut self, location: Location) -> Result<(Beacon, ReleaseOutcome)> {
        let released = self.release_beacon(location)?;
        let beacon = self
            .beacons
            .remove(&location)
            .ok_or(RegistryError::UnknownBeacon(location))?;
        debug!(%location, "beacon deleted");
        Ok((beacon, released))
    }

    fn remove_lines_touching(&mut self, team: TeamId, location: Location) {
        if let Some(lines) = self.link_lines.get_mut(&team) {
            lines.retain(|line| !line.touches(location));
            if lines.is_empty() {
                self.link_lines.remove(&team);
            }
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Drains change notifications recorded since the last call.
    pub fn take_events(&mut self) -> Vec<FieldEvent> {
        self.events.take()
    }

    /// Change notifications not yet drained.
    #[must_use]
    pub fn pending_events(&self) -> &[FieldEvent] {
        self.events.events()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn beacon_ref(&self, location: Location) -> Result<&Beacon> {
        self.beacons
            .get(&location)
            .ok_or(RegistryError::UnknownBeacon(location))
    }

    pub(crate) fn beacon_mut(&mut self, location: Location) -> Result<&mut Beacon> {
        self.beacons
            .get_mut(&location)
            .ok_or(RegistryError::UnknownBeacon(location))
    }
}

#[cfg(test)]
impl Registry {
    pub(crate) fn ledger_mut(&mut self) -> &mut ScoreLedger {
        &mut self.ledger
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
