//! Player controller module
//!
//! Provides third-person character locomotion on top of the collide-and-slide
//! solver.

mod controller;
mod movement;
pub mod orientation;
mod state;

pub use controller::PlayerController;
pub use movement::{ConfigError, MovementConfig, GRAVITY, MOVE_DEAD_ZONE, TURN_SMOOTH_TIME};
pub use orientation::YawSmoother;
pub use state::LocomotionState;
