//! Game settings
//!
//! Everything a session is built from: field and entity dimensions, speeds,
//! level grid parameters and the RNG seed. Loaded from JSON.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{LevelParams, PlayField, Size};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play field bounds
    pub field: PlayField,

    // === Paddle ===
    pub paddle_size: Size,
    /// Pixels per tick
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_size: Size,
    /// Pixels per tick; boundary lookahead
    pub ball_speed: f32,
    /// Launch velocity (pixels per tick)
    pub ball_velocity: Vec2,

    // === Blocks ===
    pub block_size: Size,
    pub level: LevelParams,

    /// RNG seed for bounce randomization
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: PlayField::new(FIELD_WIDTH, FIELD_HEIGHT),

            paddle_size: Size::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            paddle_speed: PADDLE_SPEED,

            ball_size: Size::new(BALL_SIZE, BALL_SIZE),
            ball_speed: BALL_SPEED,
            ball_velocity: Vec2::new(BALL_SPEED, -BALL_SPEED),

            block_size: Size::new(BLOCK_WIDTH, BLOCK_HEIGHT),
            level: LevelParams::default(),

            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Same settings with a different level grid
    pub fn with_level(&self, level: LevelParams) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    /// Read settings from a JSON file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({})", err);
                Self::default()
            }
        }
    }
}
