//! Game configuration loaded from an external RON file.

use bevy::log::{error, info, warn};
use bevy::prelude::Resource;
use serde::Deserialize;
use std::{fs, io};
use thiserror::Error;

use crate::player::PlayerConfig;
use crate::world::WorldSettings;

const CONFIG_PATH: &str = "assets/data/config.ron";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Zone Runner".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Top-level configuration; every field falls back to its default.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub player: PlayerConfig,
    pub world: WorldSettings,
    /// Camera interpolation speed (higher = snappier)
    pub camera_follow_speed: f32,
    /// Where the player appears when a run starts
    pub player_start: (f32, f32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            player: PlayerConfig::default(),
            world: WorldSettings::default(),
            camera_follow_speed: 5.0,
            player_start: (160.0, 120.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {0}", CONFIG_PATH)]
    Read(#[from] io::Error),
    #[error("Failed to parse {}: {0}", CONFIG_PATH)]
    Parse(#[from] ron::error::SpannedError),
}

impl GameConfig {
    /// Load from `assets/data/config.ron`, falling back to defaults.
    pub fn load() -> Self {
        match Self::read() {
            Ok(config) => {
                info!("Loaded game config from {}", CONFIG_PATH);
                config
            }
            Err(e @ ConfigError::Parse(_)) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e @ ConfigError::Read(_)) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Read `assets/data/config.ron` without logging, for use before a log
    /// subscriber is installed.
    pub fn read() -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(CONFIG_PATH)?;
        Ok(Self::from_ron(&contents)?)
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GameConfig::from_ron("(player: (move_speed: 420.0), world: (seed: 7))").unwrap();
        assert_eq!(config.player.move_speed, 420.0);
        assert_eq!(config.player.max_health, 100.0);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.start_template, "starting_zone");
        assert_eq!(config.window, WindowSettings::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(GameConfig::from_ron("(player: (move_speed: \"fast\"))").is_err());
    }

    #[test]
    fn shipped_config_reads_directly() {
        let config = GameConfig::read().unwrap();
        assert_eq!(config, GameConfig::load());
        assert!(config.window.width > 0.0 && config.window.height > 0.0);
    }
}
