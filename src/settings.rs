//! Game settings and preferences
//!
//! Persisted separately from the high score as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;
use crate::error::GameError;
use crate::platform::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Infinite lives, debug-only cheats, no high score writes
    pub debug: bool,

    // === Audio ===
    /// Background music on/off
    pub music_enabled: bool,
    /// Sound effects on/off
    pub sfx_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Power-up pickup volume (0.0 - 1.0)
    pub powerup_volume: f32,

    // === Rules ===
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Award an extra life every N levels (0 = never)
    pub bonus_life_levels: u32,
    /// Start the run in daredevil mode (one life, no power-ups)
    pub daredevil: bool,
    /// Ground-pounding a bomb destroys it instead of hurting the player.
    /// Always off in daredevil mode.
    pub ground_pound_immunity: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,

            // Audio
            music_enabled: true,
            sfx_enabled: true,
            music_volume: 1.0,
            powerup_volume: 0.3,

            // Rules
            starting_lives: STARTING_LIVES,
            bonus_life_levels: 0,
            daredevil: false,
            ground_pound_immunity: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "star_collector_settings";

    /// Read settings, failing on storage or parse errors
    pub fn try_load(storage: &dyn Storage) -> Result<Option<Self>, GameError> {
        match storage.get_item(Self::STORAGE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Read settings, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match Self::try_load(storage) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from storage");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Persist settings
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), GameError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Ground-pound immunity as it applies to a run
    pub fn effective_ground_pound_immunity(&self) -> bool {
        self.ground_pound_immunity && !self.daredevil
    }
}
