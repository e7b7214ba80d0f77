//! Core types used throughout Stride

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World up axis. Gravity acts along its negation.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Position and facing of a character.
///
/// Facing is a yaw around [`WORLD_UP`] in degrees, measured from +Z toward +X,
/// so pitch and roll are always level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Capsule base position
    pub position: Vec3,
    /// Yaw in degrees
    pub yaw: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

impl Pose {
    /// Create a pose at the given position facing +Z
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Rotation quaternion (yaw only)
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Get the forward direction (+Z rotated by yaw)
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Get the right direction (`WORLD_UP × forward`, +X at yaw 0)
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Interpolate between two poses, taking the short way around for yaw
    pub fn lerp(a: &Pose, b: &Pose, t: f32) -> Pose {
        let mut delta = (b.yaw - a.yaw).rem_euclid(360.0);
        if delta > 180.0 {
            delta -= 360.0;
        }
        Pose {
            position: a.position.lerp(b.position, t),
            yaw: a.yaw + delta * t,
        }
    }
}
