//! Triangle fields: team territory bounded by three beacons.
//!
//! A field stores the three beacon locations as they were when the field
//! formed. It never follows the live beacons, so deleting or moving a beacon
//! cannot silently reshape territory; the registry removes the field instead.
//!
//! # Identity
//!
//! Equality, ordering and hashing use the *set* of vertices. The six
//! orderings of the same three points are one field, whatever the owner:
//!
//! ```
//! use fieldlink_core::beacon::{Location, TeamId};
//! use fieldlink_core::field::TriangleField;
//!
//! let (a, b, c) = (Location::new(0, 0), Location::new(100, 0), Location::new(0, 100));
//! let one = TriangleField::new([a, b, c], Some(TeamId::new(1)), 0);
//! let two = TriangleField::new([c, a, b], None, 9);
//! assert_eq!(one, two);
//! assert_eq!(one.area(), 5000);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use tri2d::Triangle;

use crate::beacon::{Location, TeamId};

/// A triangle of territory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleField {
    vertices: [Location; 3],
    owner: Option<TeamId>,
    area: i64,
    created_at: u64,
}

impl TriangleField {
    /// Creates a field; the area is computed once here.
    #[must_use]
    pub fn new(vertices: [Location; 3], owner: Option<TeamId>, created_at: u64) -> Self {
        let [a, b, c] = vertices;
        Self {
            vertices,
            owner,
            area: tri2d::area(a.to_point(), b.to_point(), c.to_point()),
            created_at,
        }
    }

    /// Vertices in the order the field was formed.
    #[must_use]
    pub const fn vertices(&self) -> [Location; 3] {
        self.vertices
    }

    /// Vertices sorted; the field's identity.
    #[must_use]
    pub fn key(&self) -> [Location; 3] {
        let mut key = self.vertices;
        key.sort_unstable();
        key
    }

    /// Current owner.
    #[must_use]
    pub const fn owner(&self) -> Option<TeamId> {
        self.owner
    }

    /// Area credited to the owner.
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.area
    }

    /// Tick at which the field formed.
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns `true` if `location` is one of the three vertices.
    #[must_use]
    pub fn has_vertex(&self, location: Location) -> bool {
        self.vertices.contains(&location)
    }

    /// Returns `true` if the vertices are collinear.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.triangle().is_degenerate()
    }

    /// The planar triangle.
    #[must_use]
    pub fn triangle(&self) -> Triangle {
        let [a, b, c] = self.vertices;
        Triangle::new(a.to_point(), b.to_point(), c.to_point())
    }

    /// Strict containment: edges and vertices are outside.
    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        self.triangle().contains(location.to_point())
    }

    /// Returns `true` if the interiors of the two fields overlap.
    #[must_use]
    pub fn overlaps(&self, other: &TriangleField) -> bool {
        self.triangle().overlaps(&other.triangle())
    }

    /// Removes the owner, returning it.
    pub(crate) fn strip(&mut self) -> Option<TeamId> {
        self.owner.take()
    }
}

impl PartialEq for TriangleField {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TriangleField {}

impl Hash for TriangleField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for TriangleField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TriangleField {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
