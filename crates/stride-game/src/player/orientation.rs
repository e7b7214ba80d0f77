//! Facing control
//!
//! Turns the character around the vertical axis toward the direction it is
//! moving, with critically damped smoothing.

use glam::Vec3;

use super::movement::TURN_SMOOTH_TIME;

/// Smallest smoothing time accepted, avoids dividing by zero
const MIN_SMOOTH_TIME: f32 = 1.0e-4;

/// Yaw (degrees, from +Z toward +X) that faces along `direction`
pub fn yaw_toward(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z).to_degrees()
}

/// Signed shortest difference from `current` to `target`, in (-180, 180]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the rate of change between calls. The result never
/// overshoots the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = if dt > 0.0 { (output - target) / dt } else { 0.0 };
    }

    output
}

/// [`smooth_damp`] for angles in degrees, taking the short way around
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Smoothed yaw follower
#[derive(Debug, Clone, Copy)]
pub struct YawSmoother {
    /// Seconds to catch up with the target
    pub smooth_time: f32,
    /// Angular velocity in degrees per second
    angular_velocity: f32,
}

impl YawSmoother {
    pub fn new(smooth_time: f32) -> Self {
        Self {
            smooth_time,
            angular_velocity: 0.0,
        }
    }

    /// Current angular velocity in degrees per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn reset(&mut self) {
        self.angular_velocity = 0.0;
    }

    /// Advance `current_yaw` one step toward facing `direction`.
    ///
    /// Only the horizontal part of `direction` matters. A direction without
    /// one leaves the yaw as it is.
    pub fn turn_toward(&mut self, current_yaw: f32, direction: Vec3, dt: f32) -> f32 {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() <= f32::EPSILON {
            return current_yaw;
        }
        let yaw = smooth_damp_angle(
            current_yaw,
            yaw_toward(flat),
            &mut self.angular_velocity,
            self.smooth_time,
            dt,
        );
        yaw.rem_euclid(360.0)
    }
}

impl Default for YawSmoother {
    fn default() -> Self {
        Self::new(TURN_SMOOTH_TIME)
    }
}
