//! Stride Core - Core types and utilities for the Stride character controller
//!
//! This crate provides the foundational types shared by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - Pose type for a character's position and facing
//! - Frame/fixed-step time tracking

pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::{Pose, WORLD_UP};
