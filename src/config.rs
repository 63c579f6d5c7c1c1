//! Runner tuning
//!
//! Physics and pacing knobs, loadable as JSON. Persisted by the hosting page
//! in LocalStorage; the runner only ever reads it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable runner parameters (units are per animation frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    // === Body physics ===
    /// Downward acceleration in cube mode
    pub gravity: f32,
    /// Magnitude of the jump/flap impulse
    pub jump_impulse: f32,
    /// Ship-mode vertical speed cap (applied both ways)
    pub ship_max_speed: f32,
    /// Overlap allowed when deciding landing vs crash on landable obstacles
    pub landing_tolerance: f32,

    // === Player geometry ===
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === World ===
    /// Horizontal obstacle speed
    pub scroll_speed: f32,
    /// Viewport height minus this gives the ground level
    pub ground_margin: f32,
    /// Obstacles are dropped once `x + width` is this far left of the screen
    pub despawn_margin: f32,

    // === Pacing ===
    /// Frames between spawns in cube mode
    pub cube_spawn_interval: u32,
    /// Frames between spawns in ship mode
    pub ship_spawn_interval: u32,

    /// Fixed run seed (random per session when absent)
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_impulse: 12.0,
            ship_max_speed: 8.0,
            landing_tolerance: 15.0,

            player_x: 50.0,
            player_width: 30.0,
            player_height: 30.0,

            scroll_speed: 5.0,
            ground_margin: 50.0,
            despawn_margin: 100.0,

            cube_spawn_interval: 120,
            ship_spawn_interval: 15,

            seed: None,
        }
    }
}

impl RunnerConfig {
    /// LocalStorage key the hosting page writes the config under
    pub const STORAGE_KEY: &'static str = "flip_runner_config";

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("gravity", self.gravity)?;
        positive("jump_impulse", self.jump_impulse)?;
        positive("ship_max_speed", self.ship_max_speed)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("scroll_speed", self.scroll_speed)?;

        if !(self.landing_tolerance.is_finite() && self.landing_tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "landing_tolerance",
                reason: "must be zero or positive",
            });
        }
        if !(self.ground_margin.is_finite() && self.ground_margin >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "ground_margin",
                reason: "must be zero or positive",
            });
        }
        if self.cube_spawn_interval == 0 || self.ship_spawn_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "spawn_interval",
                reason: "must be at least one frame",
            });
        }
        Ok(())
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded runner config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored runner config: {}", e),
                }
            }
        }

        log::info!("Using default runner config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunnerConfig::from_json(r#"{ "scroll_speed": 7.5, "seed": 42 }"#).unwrap();
        assert_eq!(config.scroll_speed, 7.5);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.cube_spawn_interval, 120);
        assert_eq!(config.ship_spawn_interval, 15);
        assert_eq!(config.gravity, 0.6);
    }

    #[test]
    fn test_malformed_json() {
        let err = RunnerConfig::from_json("{ scroll_speed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = RunnerConfig::from_json(r#"{ "ship_spawn_interval": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let config = RunnerConfig {
            scroll_speed: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(RunnerConfig::default().validate().is_ok());
    }
}
