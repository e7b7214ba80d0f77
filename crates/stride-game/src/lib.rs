//! Stride Game - Character locomotion and its adapters
//!
//! Provides the player controller (locomotion state machine), facing control,
//! input snapshots and animation parameters.

pub mod animation;
pub mod input;
pub mod player;

pub use animation::AnimationParams;
pub use input::{camera_relative_move, InputAction, InputSnapshot, InputState};
pub use player::{ConfigError, LocomotionState, MovementConfig, PlayerController, YawSmoother};
