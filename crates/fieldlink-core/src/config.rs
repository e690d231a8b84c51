//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Limits applied by a [`crate::registry::Registry`].
///
/// The defaults are the game rules; changing them is meant for tests and
/// custom game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Outbound links a beacon may originate
    pub max_outbound_links: u8,
    /// Resonator slots per beacon
    pub max_resonators: usize,
    /// Mod slots per beacon
    pub max_mods: usize,
    /// Mods a single player may install on one beacon
    pub max_mods_per_placer: usize,
    /// Highest resonator level
    pub max_resonator_level: u8,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_outbound_links: 8,
            max_resonators: 9,
            max_mods: 4,
            max_mods_per_placer: 2,
            max_resonator_level: 8,
        }
    }
}

impl RegistryConfig {
    /// Default limits with a different outbound link cap.
    #[must_use]
    pub fn with_max_outbound_links(max_outbound_links: u8) -> Self {
        Self {
            max_outbound_links,
            ..Default::default()
        }
    }
}
