//! Directed line segments.
//!
//! Links are drawn as segments between two beacons. The field engine only
//! needs segment intersection for the triangle overlap query, so this module
//! stays small.

use serde::{Deserialize, Serialize};

use crate::triangle::orient;
use crate::Point;

/// A directed segment from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Start point
    pub from: Point,
    /// End point
    pub to: Point,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// The same segment traversed the other way.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// True if both endpoints coincide.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.from == self.to
    }

    /// Check if `p` lies on the segment, endpoints included.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        orient(self.from, self.to, p) == 0 && self.in_bounding_box(p)
    }

    /// Check if the two segments share at least one point.
    ///
    /// Touching at an endpoint and collinear overlap both count.
    #[must_use]
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = orient(other.from, other.to, self.from).signum();
        let d2 = orient(other.from, other.to, self.to).signum();
        let d3 = orient(self.from, self.to, other.from).signum();
        let d4 = orient(self.from, self.to, other.to).signum();

        if d1 * d2 < 0 && d3 * d4 < 0 {
            return true;
        }

        (d1 == 0 && other.in_bounding_box(self.from))
            || (d2 == 0 && other.in_bounding_box(self.to))
            || (d3 == 0 && self.in_bounding_box(other.from))
            || (d4 == 0 && self.in_bounding_box(other.to))
    }

    /// Check if the two segments cross at a single interior point of both.
    ///
    /// Touching, sharing an endpoint, and collinear overlap do not count.
    #[must_use]
    pub fn crosses(&self, other: &Segment) -> bool {
        let d1 = orient(other.from, other.to, self.from).signum();
        let d2 = orient(other.from, other.to, self.to).signum();
        let d3 = orient(self.from, self.to, other.from).signum();
        let d4 = orient(self.from, self.to, other.to).signum();

        d1 * d2 < 0 && d3 * d4 < 0
    }

    fn in_bounding_box(&self, p: Point) -> bool {
        p.x >= self.from.x.min(self.to.x)
            && p.x <= self.from.x.max(self.to.x)
            && p.y >= self.from.y.min(self.to.y)
            && p.y <= self.from.y.max(self.to.y)
    }
}
