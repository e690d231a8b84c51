//! Links between beacons.
//!
//! A [`Link`] is an unordered pair of beacons: `Link::new(a, b, _)` and
//! `Link::new(b, a, _)` compare equal. The link also remembers its origin
//! (the endpoint that spent an outbound slot), which fixes the direction of
//! its forward segment and lets a snapshot replay it the same way.
//!
//! [`LinkLine`] is the directed, presentation-only form kept per team by the
//! registry for renderers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use tri2d::Segment;

use crate::beacon::{Location, TeamId};

/// An unordered link between two beacons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Link {
    a: Location,
    b: Location,
    origin: Location,
    created_at: u64,
}

impl Link {
    /// Creates a link originated by `origin` towards `target`.
    #[must_use]
    pub fn new(origin: Location, target: Location, created_at: u64) -> Self {
        let (a, b) = Self::key(origin, target);
        Self {
            a,
            b,
            origin,
            created_at,
        }
    }

    /// Order-independent key for the pair `x`, `y`.
    #[must_use]
    pub fn key(x: Location, y: Location) -> (Location, Location) {
        if x <= y {
            (x, y)
        } else {
            (y, x)
        }
    }

    /// Both endpoints, smallest first.
    #[must_use]
    pub const fn endpoints(&self) -> (Location, Location) {
        (self.a, self.b)
    }

    /// The endpoint that originated the link.
    #[must_use]
    pub const fn origin(&self) -> Location {
        self.origin
    }

    /// The endpoint that received the link.
    #[must_use]
    pub fn target(&self) -> Location {
        if self.origin == self.a {
            self.b
        } else {
            self.a
        }
    }

    /// Tick at which the link was created.
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Returns `true` if `location` is one of the endpoints.
    #[must_use]
    pub fn connects(&self, location: Location) -> bool {
        self.a == location || self.b == location
    }

    /// The endpoint opposite `location`, if `location` is an endpoint.
    #[must_use]
    pub fn other(&self, location: Location) -> Option<Location> {
        if location == self.a {
            Some(self.b)
        } else if location == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Segment from origin to target.
    #[must_use]
    pub fn forward(&self) -> Segment {
        Segment::new(self.origin.to_point(), self.target().to_point())
    }

    /// Segment from target back to origin.
    #[must_use]
    pub fn reverse(&self) -> Segment {
        self.forward().reversed()
    }

    /// The directed presentation line for this link.
    #[must_use]
    pub fn line(&self) -> LinkLine {
        LinkLine::new(self.origin, self.target())
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.endpoints() == other.endpoints()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoints().hash(state);
    }
}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.endpoints().cmp(&other.endpoints())
    }
}

/// The owner a link resolves to: the shared team of both endpoints.
#[must_use]
pub fn common_owner(a: Option<TeamId>, b: Option<TeamId>) -> Option<TeamId> {
    match (a, b) {
        (Some(x), Some(y)) if x == y => Some(x),
        _ => None,
    }
}

/// A directed link line kept for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkLine {
    /// Originating beacon
    pub from: Location,
    /// Receiving beacon
    pub to: Location,
}

impl LinkLine {
    /// Creates a line.
    #[must_use]
    pub const fn new(from: Location, to: Location) -> Self {
        Self { from, to }
    }

    /// Returns `true` if either end is `location`.
    #[must_use]
    pub fn touches(&self, location: Location) -> bool {
        self.from == location || self.to == location
    }

    /// The planar segment for this line.
    #[must_use]
    pub fn segment(&self) -> Segment {
        Segment::new(self.from.to_point(), self.to.to_point())
    }
}
