//! Test helper functions for setting up registries and scenarios.
//!
//! This module provides factory functions and setup utilities that make
//! writing tests more ergonomic and consistent.

use crate::beacon::{Location, TeamId};
use crate::invariants::audit;
use crate::registry::Registry;

/// First test team.
pub const RED: TeamId = TeamId::new(1);

/// Second test team.
pub const BLUE: TeamId = TeamId::new(2);

/// Installs a test-writer subscriber so tracing output shows in failing
/// tests. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Shorthand for [`Location::new`].
pub fn loc(x: i32, z: i32) -> Location {
    Location::new(x, z)
}

// =============================================================================
// Scenario Setup
// =============================================================================

/// Registers a beacon at every point, owned by `team`.
pub fn place_all(
    registry: &mut Registry,
    points: &[(i32, i32)],
    team: Option<TeamId>,
) -> Vec<Location> {
    points
        .iter()
        .map(|&(x, z)| {
            registry
                .register_beacon(loc(x, z), 64, team)
                .expect("test beacon location is free")
        })
        .collect()
}

/// Links every consecutive pair and closes the cycle back to the start.
pub fn link_cycle(registry: &mut Registry, cycle: &[Location]) {
    for (i, &source) in cycle.iter().enumerate() {
        let destination = cycle[(i + 1) % cycle.len()];
        registry
            .add_outbound_link(source, destination)
            .expect("test link is valid");
    }
}

/// A registry holding one red field over (0,0), (100,0), (0,100).
///
/// Links run (0,0) -> (100,0) -> (0,100) -> (0,0).
pub fn setup_red_triangle() -> (Registry, [Location; 3]) {
    let mut registry = Registry::new();
    let placed = place_all(&mut registry, &[(0, 0), (100, 0), (0, 100)], Some(RED));
    link_cycle(&mut registry, &placed);
    (registry, [placed[0], placed[1], placed[2]])
}

/// Red beacons on a 4x4 grid with spacing 100, no links.
pub fn setup_red_grid() -> (Registry, Vec<Location>) {
    let mut registry = Registry::new();
    let points: Vec<_> = (0..4)
        .flat_map(|x| (0..4).map(move |z| (x * 100, z * 100)))
        .collect();
    let placed = place_all(&mut registry, &points, Some(RED));
    (registry, placed)
}

/// Panics with every violation if the registry is inconsistent.
pub fn assert_consistent(registry: &Registry) {
    let violations = audit(registry);
    assert!(violations.is_empty(), "invariant violations: {violations:#?}");
}
