use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MAX_PITCH;

/// Errors raised while loading or validating a [`ControllerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("`{field}` must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`pitch_limit` must not exceed {max} degrees, got {value}")]
    PitchLimit { value: f32, max: f32 },
    #[error("crouch height {crouch} is above stand height {stand}")]
    StanceOrder { crouch: f32, stand: f32 },
    #[error("`{field}` must point down (<= 0), got {value}")]
    PositiveGravity { field: &'static str, value: f32 },
    #[error("could not read controller config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed controller config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every tunable of the grappling-hook controller.
///
/// Angles are in degrees, distances in world units and rates per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub mouse_sensitivity: f32,
    pub pitch_limit: f32,

    pub walk_speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,
    /// Vertical velocity applied by a grounded jump.
    pub jump_height: f32,

    pub stand_height: f32,
    pub crouch_height: f32,
    /// Time constant of the direction damping, in seconds.
    pub move_smoothing: f32,
    /// Exponential rate of the stance height approach.
    pub crouch_smoothing: f32,
    /// The camera sits this far below the top of the capsule.
    pub camera_eye_drop: f32,
    pub ceiling_probe_distance: f32,

    pub hook_pull_speed: f32,
    pub hook_throw_speed: f32,
    pub hook_max_distance: f32,
    pub hook_release_distance: f32,
    /// Upward boost added when jumping off the rope.
    pub hook_jump_launch_speed: f32,

    pub momentum_drag: f32,
    /// Momentum shorter than this snaps to zero.
    pub momentum_epsilon: f32,

    pub gravity: f32,
    pub grounded_bias: f32,

    pub capsule_radius: f32,
    /// If the distance to the ground is less than this value, the player is considered grounded
    pub grounded_distance: f32,
    /// Minimum `normal.y` of a surface that counts as ground.
    pub traction_normal_cutoff: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 500.0,
            pitch_limit: 90.0,

            walk_speed: 3.0,
            run_speed: 6.0,
            crouch_speed: 2.0,
            jump_height: 6.0,

            stand_height: 2.0,
            crouch_height: 1.0,
            move_smoothing: 0.15,
            crouch_smoothing: 10.0,
            camera_eye_drop: 0.25,
            ceiling_probe_distance: 1.0,

            hook_pull_speed: 20.0,
            hook_throw_speed: 40.0,
            hook_max_distance: 30.0,
            hook_release_distance: 1.0,
            hook_jump_launch_speed: 10.0,

            momentum_drag: 3.0,
            momentum_epsilon: 0.01,

            gravity: -19.82,
            grounded_bias: -4.5,

            capsule_radius: 0.5,
            grounded_distance: 0.125,
            traction_normal_cutoff: 0.7,
        }
    }
}

impl ControllerConfig {
    /// Parses a JSON document, filling missing fields with defaults, and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("pitch_limit", self.pitch_limit),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("crouch_speed", self.crouch_speed),
            ("jump_height", self.jump_height),
            ("stand_height", self.stand_height),
            ("crouch_height", self.crouch_height),
            ("move_smoothing", self.move_smoothing),
            ("crouch_smoothing", self.crouch_smoothing),
            ("camera_eye_drop", self.camera_eye_drop),
            ("ceiling_probe_distance", self.ceiling_probe_distance),
            ("hook_pull_speed", self.hook_pull_speed),
            ("hook_throw_speed", self.hook_throw_speed),
            ("hook_max_distance", self.hook_max_distance),
            ("hook_release_distance", self.hook_release_distance),
            ("hook_jump_launch_speed", self.hook_jump_launch_speed),
            ("momentum_drag", self.momentum_drag),
            ("momentum_epsilon", self.momentum_epsilon),
            ("gravity", self.gravity),
            ("grounded_bias", self.grounded_bias),
            ("capsule_radius", self.capsule_radius),
            ("grounded_distance", self.grounded_distance),
            ("traction_normal_cutoff", self.traction_normal_cutoff),
        ];
        for (field, value) in all {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let non_negative = [
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("crouch_speed", self.crouch_speed),
            ("jump_height", self.jump_height),
            ("camera_eye_drop", self.camera_eye_drop),
            ("hook_pull_speed", self.hook_pull_speed),
            ("hook_release_distance", self.hook_release_distance),
            ("hook_jump_launch_speed", self.hook_jump_launch_speed),
            ("momentum_drag", self.momentum_drag),
            ("grounded_distance", self.grounded_distance),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("pitch_limit", self.pitch_limit),
            ("stand_height", self.stand_height),
            ("crouch_height", self.crouch_height),
            ("move_smoothing", self.move_smoothing),
            ("crouch_smoothing", self.crouch_smoothing),
            ("ceiling_probe_distance", self.ceiling_probe_distance),
            ("hook_throw_speed", self.hook_throw_speed),
            ("hook_max_distance", self.hook_max_distance),
            ("momentum_epsilon", self.momentum_epsilon),
            ("capsule_radius", self.capsule_radius),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.pitch_limit > MAX_PITCH {
            return Err(ConfigError::PitchLimit {
                value: self.pitch_limit,
                max: MAX_PITCH,
            });
        }
        if self.crouch_height > self.stand_height {
            return Err(ConfigError::StanceOrder {
                crouch: self.crouch_height,
                stand: self.stand_height,
            });
        }
        for (field, value) in [("gravity", self.gravity), ("grounded_bias", self.grounded_bias)] {
            if value > 0.0 {
                return Err(ConfigError::PositiveGravity { field, value });
            }
        }
        Ok(())
    }
}
