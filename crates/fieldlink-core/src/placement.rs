//! Seeded beacon placement.
//!
//! [`scatter`] fills a rectangle with unowned beacons. The same seed, config
//! and starting registry always give the same locations, so a map can be
//! regenerated from its seed alone.

use glam::I64Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tri2d::Rect;

use tracing::{debug, warn};

use crate::beacon::Location;
use crate::error::Result;
use crate::registry::Registry;

/// Configuration for [`scatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Area to place beacons in, corners inclusive
    pub bounds: Rect,
    /// Number of beacons to place
    pub count: usize,
    /// Minimum Euclidean distance to any registered beacon
    pub min_spacing: u32,
    /// Height given to every placed beacon
    pub height: i32,
    /// Random draws allowed before giving up
    pub max_attempts: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            count: 32,
            min_spacing: 48,
            height: 64,
            max_attempts: 4096,
        }
    }
}

impl PlacementConfig {
    /// Default spacing and attempts with custom bounds and count.
    #[must_use]
    pub fn with_bounds(bounds: Rect, count: usize) -> Self {
        Self {
            bounds,
            count,
            ..Default::default()
        }
    }
}

/// Registers up to `config.count` unowned beacons at seeded random
/// locations and returns them in placement order.
///
/// A draw closer than `min_spacing` to any registered beacon is discarded.
/// When the attempts run out first, the beacons placed so far are kept.
/// Corners given in the wrong order are swapped before drawing.
///
/// # Errors
///
/// Propagates registration errors; none occur for locations drawn here.
pub fn scatter(
    registry: &mut Registry,
    config: &PlacementConfig,
    seed: u64,
) -> Result<Vec<Location>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let Rect { min, max } = Rect::new(config.bounds.min, config.bounds.max);
    let spacing = i128::from(config.min_spacing);
    let spacing_sq = spacing * spacing;

    let mut placed = Vec::with_capacity(config.count);
    let mut attempts = 0;
    while placed.len() < config.count && attempts < config.max_attempts {
        attempts += 1;
        let candidate = Location::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));

        let crowded = registry
            .beacons()
            .any(|beacon| distance_sq(beacon.location(), candidate) < spacing_sq);
        if crowded || registry.contains(candidate) {
            continue;
        }

        placed.push(registry.register_beacon(candidate, config.height, None)?);
    }

    if placed.len() < config.count {
        warn!(
            requested = config.count,
            placed = placed.len(),
            attempts,
            "placement ran out of attempts"
        );
    }
    debug!(seed, placed = placed.len(), attempts, "beacons scattered");
    Ok(placed)
}

// Squared in i128: an i32 delta fits i64, its square does not.
fn distance_sq(a: Location, b: Location) -> i128 {
    let delta: I64Vec2 = a.to_point().as_i64vec2() - b.to_point().as_i64vec2();
    let (dx, dz) = (i128::from(delta.x), i128::from(delta.y));
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;
    use tri2d::Point;

    fn small_config() -> PlacementConfig {
        PlacementConfig {
            bounds: Rect::centered(200, 200),
            count: 10,
            min_spacing: 20,
            height: 70,
            max_attempts: 10_000,
        }
    }

    #[test]
    fn same_seed_same_locations() {
        let config = small_config();
        let mut one = Registry::new();
        let mut two = Registry::new();
        assert_eq!(
            scatter(&mut one, &config, 42).unwrap(),
            scatter(&mut two, &config, 42).unwrap()
        );
    }

    #[test]
    fn different_seeds_differ() {
        let config = small_config();
        let one = scatter(&mut Registry::new(), &config, 1).unwrap();
        let two = scatter(&mut Registry::new(), &config, 2).unwrap();
        assert_ne!(one, two);
    }

    #[test]
    fn placed_beacons_are_unowned_and_in_bounds() {
        let config = small_config();
        let mut registry = Registry::new();
        let placed = scatter(&mut registry, &config, 7).unwrap();

        assert_eq!(placed.len(), 10);
        for location in placed {
            let beacon = registry.beacon(location).unwrap();
            assert!(!beacon.is_owned());
            assert_eq!(beacon.height(), 70);
            assert!(config.bounds.contains(location.to_point()));
        }
    }

    #[test]
    fn spacing_is_respected() {
        let config = small_config();
        let mut registry = Registry::new();
        let placed = scatter(&mut registry, &config, 9).unwrap();

        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(distance_sq(*a, *b) >= 400);
            }
        }
    }

    #[test]
    fn crowded_area_places_fewer() {
        let config = PlacementConfig {
            bounds: Rect::new(Point::new(0, 0), Point::new(10, 10)),
            count: 50,
            min_spacing: 8,
            height: 64,
            max_attempts: 500,
        };
        let mut registry = Registry::new();
        let placed = scatter(&mut registry, &config, 3).unwrap();

        assert!(!placed.is_empty());
        assert!(placed.len() < 50);
        assert_eq!(registry.beacon_count(), placed.len());
    }

    #[test]
    fn swapped_corners_from_json_are_normalised() {
        let json = r#"{"bounds":{"min":[10,10],"max":[0,0]},"count":3,"min_spacing":1}"#;
        let config: PlacementConfig = serde_json::from_str(json).unwrap();
        let mut registry = Registry::new();
        let placed = scatter(&mut registry, &config, 5).unwrap();

        assert_eq!(placed.len(), 3);
        let bounds = Rect::new(Point::new(0, 0), Point::new(10, 10));
        for location in placed {
            assert!(bounds.contains(location.to_point()));
        }
    }

    #[test]
    fn full_range_bounds_do_not_overflow() {
        let config = PlacementConfig {
            bounds: Rect::centered(i32::MAX, i32::MAX),
            count: 4,
            min_spacing: u32::MAX,
            height: 64,
            max_attempts: 100,
        };
        let mut registry = Registry::new();
        let placed = scatter(&mut registry, &config, 11).unwrap();
        assert!(!placed.is_empty());
    }

    #[test]
    fn distance_between_far_corners_is_exact() {
        let a = Location::new(i32::MIN, i32::MIN);
        let b = Location::new(i32::MAX, i32::MAX);
        let span = i128::from(u32::MAX);
        assert_eq!(distance_sq(a, b), 2 * span * span);
    }
}
