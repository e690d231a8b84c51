//! Change notifications for presentation collaborators.
//!
//! The registry appends a [`FieldEvent`] for every structural change it
//! makes. Nothing inside the engine reads them back; renderers and
//! scoreboards drain the log with
//! [`Registry::take_events`](crate::registry::Registry::take_events),
//! typically once per game tick.

use serde::{Deserialize, Serialize};

use crate::beacon::{Location, TeamId};

/// Something that changed in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldEvent {
    /// A beacon changed hands.
    BeaconCaptured {
        /// Captured beacon
        location: Location,
        /// New owner
        team: TeamId,
    },
    /// A beacon lost its owner, links and fields.
    BeaconReleased {
        /// Released beacon
        location: Location,
        /// Owner before the release
        previous_owner: Option<TeamId>,
    },
    /// A link resolved between two beacons.
    LinkCreated {
        /// Originating beacon
        origin: Location,
        /// Receiving beacon
        target: Location,
        /// Team owning both ends
        team: TeamId,
    },
    /// A link was torn down.
    LinkRemoved {
        /// Originating beacon
        origin: Location,
        /// Receiving beacon
        target: Location,
    },
    /// A field was created and credited.
    FieldCreated {
        /// Field vertices
        vertices: [Location; 3],
        /// Credited team
        team: TeamId,
        /// Credited area
        area: i64,
    },
    /// A field was removed and debited.
    FieldDestroyed {
        /// Field vertices
        vertices: [Location; 3],
        /// Team that owned the field
        team: Option<TeamId>,
        /// Debited area
        area: i64,
    },
}

impl FieldEvent {
    /// Returns `true` for the two field variants.
    #[must_use]
    pub const fn is_field_event(&self) -> bool {
        matches!(self, Self::FieldCreated { .. } | Self::FieldDestroyed { .. })
    }
}

/// Ordered event log owned by the registry.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FieldEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: FieldEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in order.
    pub fn take(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[FieldEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
