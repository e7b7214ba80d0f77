//! Movement configuration and constants

use serde::{Deserialize, Serialize};
use stride_physics::{CapsuleShape, ShapeError};

/// Gravitational acceleration in meters per second squared, before scaling
pub const GRAVITY: f32 = 9.8;

/// Move input below this magnitude is ignored
pub const MOVE_DEAD_ZONE: f32 = 0.1;

/// Seconds the orientation takes to catch up with the movement direction
pub const TURN_SMOOTH_TIME: f32 = 0.1;

/// Errors produced when validating a [`MovementConfig`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeValue { name: &'static str, value: f32 },

    #[error("Max slope angle must be within [0, 90) degrees, got {0}")]
    InvalidSlopeAngle(f32),

    #[error("Gravity scale must be positive, got {0}")]
    InvalidGravityScale(f32),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidFriction { name: &'static str, value: f32 },
}

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed in meters per second
    pub walk_speed: f32,
    /// Running speed in meters per second
    pub run_speed: f32,
    /// Jump apex height in meters
    pub jump_power: f32,
    /// Steepest walkable slope in degrees
    pub max_slope_angle: f32,
    /// Gravity multiplier (1.0 = normal gravity)
    pub gravity_scale: f32,
    /// Fraction of vertical velocity removed per physics step while airborne
    pub air_friction: f32,
    /// Fraction of horizontal velocity removed per physics step
    pub ground_friction: f32,
    /// Seconds off the ground before the character counts as falling
    pub falling_air_time_threshold: f32,
    /// Collision groups the capsule collides with
    pub collision_mask: u32,
    /// Collision capsule
    pub capsule: CapsuleShape,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            run_speed: 6.0,
            jump_power: 6.0,
            max_slope_angle: 55.0,
            gravity_scale: 2.0,
            air_friction: 0.1,
            ground_friction: 0.5,
            falling_air_time_threshold: 1.0,
            collision_mask: u32::MAX,
            capsule: CapsuleShape::default(),
        }
    }
}

impl MovementConfig {
    /// Replace the capsule dimensions, keeping the default skin width
    pub fn with_capsule(mut self, radius: f32, height: f32) -> Result<Self, ConfigError> {
        self.capsule = CapsuleShape::new(radius, height)?;
        Ok(self)
    }

    /// Check every tuning value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("jump_power", self.jump_power),
            ("falling_air_time_threshold", self.falling_air_time_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }

        if !(0.0..90.0).contains(&self.max_slope_angle) {
            return Err(ConfigError::InvalidSlopeAngle(self.max_slope_angle));
        }

        if !(self.gravity_scale > 0.0) || !self.gravity_scale.is_finite() {
            return Err(ConfigError::InvalidGravityScale(self.gravity_scale));
        }

        for (name, value) in [
            ("air_friction", self.air_friction),
            ("ground_friction", self.ground_friction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidFriction { name, value });
            }
        }

        Ok(())
    }

    /// Get the current max speed based on the run modifier
    pub fn max_speed(&self, running: bool) -> f32 {
        if running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Scaled gravitational acceleration
    pub fn gravity(&self) -> f32 {
        GRAVITY * self.gravity_scale
    }

    /// Launch speed that peaks exactly `jump_power` meters up under [`Self::gravity`]
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.jump_power * self.gravity()).sqrt()
    }
}
