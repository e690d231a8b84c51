//! # tri2d
//!
//! Integer 2D geometry for territory fields.
//!
//! Beacons sit on an integer grid, so every predicate here works on
//! [`Point`] (`glam::IVec2`) and does its arithmetic in `i128`. That keeps
//! the results exact: there is no epsilon anywhere in this crate.
//!
//! Only the predicates the field engine needs are provided:
//!
//! - **Area**: shoelace determinant, signed and absolute
//! - **Containment**: three-way classification of a point against a triangle
//! - **Segments**: inclusive intersection and proper crossing
//! - **Overlap**: triangle-vs-triangle interior overlap
//!
//! ## Boundary policy
//!
//! A point on an edge or at a vertex is *not* contained. [`Triangle::contains`]
//! is true only for [`Containment::Inside`]. Callers who need the boundary
//! case can use [`Triangle::classify`] directly.
//!
//! ## Quick Start
//!
//! ```
//! use tri2d::{Point, Triangle};
//!
//! let tri = Triangle::new(Point::new(0, 0), Point::new(100, 0), Point::new(0, 100));
//! assert_eq!(tri.area(), 5000);
//! assert!(tri.contains(Point::new(10, 10)));
//! assert!(!tri.contains(Point::new(50, 0))); // on an edge
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod segment;
pub mod triangle;

pub use segment::Segment;
pub use triangle::{area, classify_point, point_in_triangle, signed_area, Containment, Triangle};

/// A point on the integer map grid.
pub type Point = glam::IVec2;

/// Axis-aligned integer rectangle, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Minimum corner
    pub min: Point,
    /// Maximum corner
    pub max: Point,
}

impl Rect {
    /// Create a rectangle from two corners in any order.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a rectangle of the given half-extent centered at the origin.
    #[must_use]
    pub fn centered(half_width: i32, half_height: i32) -> Self {
        Self::new(
            Point::new(-half_width, -half_height),
            Point::new(half_width, half_height),
        )
    }

    /// Number of grid columns covered.
    #[must_use]
    pub fn width(&self) -> i64 {
        i64::from(self.max.x) - i64::from(self.min.x) + 1
    }

    /// Number of grid rows covered.
    #[must_use]
    pub fn height(&self) -> i64 {
        i64::from(self.max.y) - i64::from(self.min.y) + 1
    }

    /// Check if a point is inside the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::centered(512, 512)
    }
}
