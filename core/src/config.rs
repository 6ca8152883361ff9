//! Arena settings
//!
//! Loaded from and saved to the platform config directory via confy.
//! Every field has a sensible default, so a missing file never blocks
//! startup.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "wylds";
const CONFIG_NAME: &str = "config";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Seconds of inactivity before a waiting turn is forced forward.
    pub stall_timeout_secs: u64,
    /// Seconds a finished session stays inspectable before removal.
    pub retention_secs: u64,
    /// Fixed RNG seed for reproducible battles. `None` uses entropy.
    pub rng_seed: Option<u64>,
    /// Directory of extra encounter pack TOML files.
    pub encounter_pack_dir: Option<PathBuf>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            stall_timeout_secs: 120,
            retention_secs: 300,
            rng_seed: None,
            encounter_pack_dir: None,
        }
    }
}

impl ArenaConfig {
    /// Load from the platform config directory, writing defaults on
    /// first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config = confy::load(APP_NAME, CONFIG_NAME)?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_battle_ready() {
        let config = ArenaConfig::default();
        assert_eq!(config.stall_timeout(), Duration::from_secs(120));
        assert_eq!(config.retention(), Duration::from_secs(300));
        assert!(config.rng_seed.is_none());
        assert!(config.encounter_pack_dir.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ArenaConfig =
            toml::from_str("stall_timeout_secs = 5").expect("valid settings");
        assert_eq!(config.stall_timeout_secs, 5);
        assert_eq!(config.retention_secs, 300);
    }
}
