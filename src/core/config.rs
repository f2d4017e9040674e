//=========================================================================
// Game Configuration
//=========================================================================
//
// Tunables for the platformer, loadable from a TOML file.
//
// The host re-reads the tuning file on every hot reload, so editing a
// value and pressing the reload key is how "new code" reaches a running
// session. Anything missing from the file falls back to the defaults.
//
// ```toml
// player_speed = 260.0
// jump_impulse = 420.0
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::backend::{EngineSettings, ScaleMode, Vec2};
use crate::core::error::ConfigError;

/// Upper bound on blinks per hazard hit.
pub const MAX_BLINK_COUNT: u32 = 60;

//=== GameConfig ==========================================================

/// Gameplay and engine tunables.
///
/// # Default Values
///
/// - **Canvas**: 800 x 600, fit scaling
/// - **Gravity**: 300 px/s² world gravity
/// - **Player**: speed 200, jump impulse 350, bounce 0.2
/// - **Spawn**: (100, 450)
/// - **Hazard blink**: 5 blinks, toggling every 6 frames
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub gravity_y: f32,
    pub player_speed: f32,
    pub jump_impulse: f32,
    pub player_bounce: f32,
    /// Extra gravity on the player body, applied when it is created.
    pub player_gravity_y: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub blink_count: u32,
    pub blink_interval_frames: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            gravity_y: 300.0,
            player_speed: 200.0,
            jump_impulse: 350.0,
            player_bounce: 0.2,
            player_gravity_y: 0.0,
            spawn_x: 100.0,
            spawn_y: 450.0,
            blink_count: 5,
            blink_interval_frames: 6,
        }
    }
}

impl GameConfig {
    //--- Loading ----------------------------------------------------------

    /// Reads and validates a TOML tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(target: "config", "Loaded tuning from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }

        for (name, value) in [
            ("player_speed", self.player_speed),
            ("jump_impulse", self.jump_impulse),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("gravity_y", self.gravity_y),
            ("player_gravity_y", self.player_gravity_y),
            ("spawn_x", self.spawn_x),
            ("spawn_y", self.spawn_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.player_bounce) {
            return Err(ConfigError::Invalid(format!(
                "player_bounce must be within 0..=1, got {}",
                self.player_bounce
            )));
        }
        if self.blink_count > MAX_BLINK_COUNT {
            return Err(ConfigError::Invalid(format!(
                "blink_count must be at most {}, got {}",
                MAX_BLINK_COUNT, self.blink_count
            )));
        }
        if self.blink_interval_frames == 0 {
            return Err(ConfigError::Invalid(
                "blink_interval_frames must be positive".to_string(),
            ));
        }
        Ok(())
    }

    //--- Derived Values ---------------------------------------------------

    pub fn spawn(&self) -> Vec2 {
        Vec2::new(self.spawn_x, self.spawn_y)
    }

    /// Construction parameters for an engine instance running `scene`.
    pub fn engine_settings(&self, scene: &str) -> EngineSettings {
        EngineSettings {
            width: self.width,
            height: self.height,
            scale_mode: ScaleMode::Fit,
            gravity_y: self.gravity_y,
            scene: scene.to_string(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
