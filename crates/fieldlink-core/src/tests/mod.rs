//! Test module for end-to-end, determinism and property tests.
//!
//! This module exercises the registry through its public API only:
//! - **Integration tests**: link, capture, release and snapshot flows
//! - **Determinism tests**: identical inputs give identical state hashes
//! - **Property tests**: invariants over random link/release sequences
//! - **Helper functions**: scenario setup shared by the above
//!
//! # Test Structure
//!
//! - `integration.rs`: end-to-end flows through the registry
//! - `determinism.rs`: state hash equality across runs and replays
//! - `properties.rs`: `proptest` invariants
//! - `helpers.rs`: scenario factories and tracing setup

mod helpers;

// Re-export for convenience
pub use helpers::*;
