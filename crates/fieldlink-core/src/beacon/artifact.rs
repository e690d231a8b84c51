//! Artifacts deployed on a beacon.
//!
//! A beacon carries up to nine resonators and up to four mods. Both kinds are
//! placed by a player and share the same slot list on the beacon, so they are
//! modelled as one closed enum with a payload per kind.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PlayerId;

/// Kind tag for an [`Artifact`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Powers the beacon; levels 1 through 8
    Resonator,
    /// Modifies the beacon's behaviour
    Mod,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resonator => write!(f, "Resonator"),
            Self::Mod => write!(f, "Mod"),
        }
    }
}

/// The kinds of mod a player can install.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModKind {
    /// Mitigates incoming attacks
    Shield,
    /// Shortens the hack cooldown
    HeatSink,
    /// Allows extra hacks before burnout
    MultiHack,
    /// Extends link range
    LinkAmp,
    /// Boosts the beacon's counter-attack
    ForceAmp,
    /// Increases counter-attack frequency
    Turret,
}

/// A resonator record: who placed it and at what level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resonator {
    /// Player that deployed the resonator
    pub placer: PlayerId,
    /// Power level (1..=8 by default)
    pub level: u8,
}

impl Resonator {
    /// Creates a resonator record.
    #[must_use]
    pub const fn new(placer: PlayerId, level: u8) -> Self {
        Self { placer, level }
    }
}

/// A mod record: who installed it and which kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mod {
    /// Player that installed the mod
    pub placer: PlayerId,
    /// Kind of mod
    pub kind: ModKind,
}

impl Mod {
    /// Creates a mod record.
    #[must_use]
    pub const fn new(placer: PlayerId, kind: ModKind) -> Self {
        Self { placer, kind }
    }
}

/// Something a player deployed on a beacon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Artifact {
    /// A resonator
    Resonator(Resonator),
    /// A mod
    Mod(Mod),
}

impl Artifact {
    /// Returns the kind tag for this artifact.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            Self::Resonator(_) => ArtifactKind::Resonator,
            Self::Mod(_) => ArtifactKind::Mod,
        }
    }

    /// Returns the player that deployed this artifact.
    #[must_use]
    pub const fn placer(&self) -> PlayerId {
        match self {
            Self::Resonator(r) => r.placer,
            Self::Mod(m) => m.placer,
        }
    }

    /// Returns the resonator record, if this is a resonator.
    #[must_use]
    pub const fn as_resonator(&self) -> Option<&Resonator> {
        match self {
            Self::Resonator(r) => Some(r),
            Self::Mod(_) => None,
        }
    }

    /// Returns the mod record, if this is a mod.
    #[must_use]
    pub const fn as_mod(&self) -> Option<&Mod> {
        match self {
            Self::Mod(m) => Some(m),
            Self::Resonator(_) => None,
        }
    }

    /// Returns `true` if this is a resonator.
    #[must_use]
    pub const fn is_resonator(&self) -> bool {
        matches!(self, Self::Resonator(_))
    }

    /// Returns `true` if this is a mod.
    #[must_use]
    pub const fn is_mod(&self) -> bool {
        matches!(self, Self::Mod(_))
    }
}

impl From<Resonator> for Artifact {
    fn from(r: Resonator) -> Self {
        Self::Resonator(r)
    }
}

impl From<Mod> for Artifact {
    fn from(m: Mod) -> Self {
        Self::Mod(m)
    }
}
