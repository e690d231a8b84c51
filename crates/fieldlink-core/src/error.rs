//! Error types for the field engine.
//!
//! Only invalid arguments are errors. Capacity rejections and triangle
//! rejections (enemy inside, duplicate, degenerate) are ordinary outcomes and
//! live in [`crate::outcome`].

use thiserror::Error;

use crate::beacon::{Location, PlayerId, TeamId};

/// Errors raised when changing the artifacts on a beacon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeaconError {
    /// All resonator slots are taken.
    #[error("beacon already holds {max} resonators")]
    ResonatorsFull {
        /// Configured resonator cap
        max: usize,
    },
    /// All mod slots are taken.
    #[error("beacon already holds {max} mods")]
    ModsFull {
        /// Configured mod cap
        max: usize,
    },
    /// The placer already has the maximum number of mods on this beacon.
    #[error("player {placer} already placed {max} mods on this beacon")]
    PlacerModLimit {
        /// Offending player
        placer: PlayerId,
        /// Configured per-placer cap
        max: usize,
    },
    /// Resonator level outside `1..=max`.
    #[error("resonator level {level} is outside 1..={max}")]
    InvalidResonatorLevel {
        /// Requested level
        level: u8,
        /// Configured maximum level
        max: u8,
    },
    /// No artifact at the given slot.
    #[error("no artifact in slot {slot}")]
    NoSuchArtifact {
        /// Requested slot
        slot: usize,
    },
}

/// Errors raised by [`crate::registry::Registry`] operations.
///
/// Every variant means the caller asked for something that cannot be true
/// of a consistent registry. None of them leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No beacon at the location.
    #[error("no beacon registered at {0}")]
    UnknownBeacon(Location),
    /// A beacon already occupies the location.
    #[error("a beacon is already registered at {0}")]
    DuplicateBeacon(Location),
    /// Source and destination are the same beacon.
    #[error("beacon at {0} cannot link to itself")]
    SelfLink(Location),
    /// The beacon must be owned for this operation.
    #[error("beacon at {0} has no owner")]
    Unowned(Location),
    /// The beacon is not owned by the expected team.
    #[error("beacon at {location} is owned by {actual:?}, expected {expected}")]
    OwnerMismatch {
        /// Beacon with the wrong owner
        location: Location,
        /// Team the operation required
        expected: TeamId,
        /// Team that actually owns it
        actual: Option<TeamId>,
    },
    /// A snapshot could not be replayed.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
    /// An artifact operation failed.
    #[error(transparent)]
    Beacon(#[from] BeaconError),
}

/// Result alias for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
