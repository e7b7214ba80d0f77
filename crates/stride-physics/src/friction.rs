//! Velocity damping

use glam::Vec3;

/// Velocities slower than this are snapped to rest
pub const REST_SPEED: f32 = 0.001;

/// Remove `coefficient` of `velocity` this step, snapping to zero once it creeps
pub fn apply_friction(velocity: Vec3, coefficient: f32) -> Vec3 {
    let damped = velocity - velocity * coefficient;
    if damped.length() < REST_SPEED {
        Vec3::ZERO
    } else {
        damped
    }
}

/// Scalar form of [`apply_friction`] for speeds along a single axis
pub fn apply_friction_scalar(speed: f32, coefficient: f32) -> f32 {
    let damped = speed - speed * coefficient;
    if damped.abs() < REST_SPEED {
        0.0
    } else {
        damped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friction_damps() {
        let v = apply_friction(Vec3::new(4.0, 0.0, -2.0), 0.5);
        assert!((v - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_friction_snaps_to_rest() {
        assert_eq!(apply_friction(Vec3::new(0.0015, 0.0, 0.0), 0.5), Vec3::ZERO);
        assert_eq!(apply_friction_scalar(-0.0019, 0.5), 0.0);
    }

    #[test]
    fn test_zero_friction_is_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(apply_friction(v, 0.0), v);
        assert_eq!(apply_friction_scalar(-3.0, 0.0), -3.0);
    }
}
