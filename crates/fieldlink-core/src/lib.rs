//! # Fieldlink Core
//!
//! Territory engine for a capture-the-beacon game.
//!
//! Teams capture beacons on a 2D map, link pairs of beacons they own, and
//! score the area of every triangle closed by three mutual links. This crate
//! owns that state and keeps it consistent:
//!
//! - **Beacons**: capturable nodes keyed by location, with a capped number
//!   of outbound links and deployable resonators and mods
//! - **Links**: unordered beacon pairs; creating one runs triangle discovery
//! - **Fields**: validated triangles, deduplicated by their vertex set
//! - **Scores**: per-team area, updated in lock-step with the field set
//! - **Teardown**: releasing a beacon removes its links and fields and
//!   reverses exactly the score they earned
//!
//! Geometry lives in the [`tri2d`] crate, re-exported here.
//!
//! ## Quick Start
//!
//! ```
//! use fieldlink_core::{Location, Registry, TeamId};
//!
//! let red = TeamId::new(1);
//! let mut registry = Registry::new();
//! for (x, z) in [(0, 0), (100, 0), (0, 100)] {
//!     registry.register_beacon(Location::new(x, z), 64, Some(red))?;
//! }
//!
//! registry.add_outbound_link(Location::new(0, 0), Location::new(100, 0))?;
//! registry.add_outbound_link(Location::new(100, 0), Location::new(0, 100))?;
//! registry.add_outbound_link(Location::new(0, 100), Location::new(0, 0))?;
//! assert_eq!(registry.score(red), 5000);
//!
//! // Losing a vertex tears the field down again.
//! registry.release_beacon(Location::new(100, 0))?;
//! assert_eq!(registry.score(red), 0);
//! # Ok::<(), fieldlink_core::RegistryError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export tri2d for geometry queries
pub use tri2d;

pub mod beacon;
pub mod config;
pub mod error;
pub mod event;
pub mod field;
pub mod hash;
pub mod invariants;
pub mod ledger;
pub mod link;
pub mod outcome;
pub mod placement;
pub mod registry;
pub mod snapshot;

// Re-exports for convenience
pub use beacon::{Artifact, Beacon, Location, Mod, ModKind, PlayerId, Resonator, TeamId};
pub use config::RegistryConfig;
pub use error::{BeaconError, RegistryError, Result};
pub use event::FieldEvent;
pub use field::TriangleField;
pub use hash::hash_registry;
pub use invariants::{audit, InvariantViolation};
pub use ledger::ScoreLedger;
pub use link::{Link, LinkLine};
pub use outcome::{LinkOutcome, ReleaseOutcome, TriangleOutcome};
pub use placement::{scatter, PlacementConfig};
pub use registry::Registry;
pub use snapshot::{BeaconRecord, LinkTarget, RegistrySnapshot};

#[cfg(test)]
mod tests;
