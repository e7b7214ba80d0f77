//! Player controller: locomotion state machine driving collide-and-slide

use glam::{Quat, Vec3};
use stride_core::{Pose, WORLD_UP};
use stride_physics::{
    apply_friction, apply_friction_scalar, CollideAndSlide, GroundContact, ShapeCaster,
    SlidePass, SlideRequest,
};
use tracing::debug;

use crate::input::InputSnapshot;

use super::movement::{ConfigError, MovementConfig, MOVE_DEAD_ZONE};
use super::orientation::YawSmoother;
use super::state::LocomotionState;

/// Player controller handling input, velocity, contact state and collision
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Movement configuration
    config: MovementConfig,
    /// Collide-and-slide solver for this character's capsule
    solver: CollideAndSlide,
    /// Facing smoother
    orientation: YawSmoother,
    /// Capsule base position and facing
    pose: Pose,
    /// Horizontal velocity (X, Z only)
    horizontal_velocity: Vec3,
    /// Vertical velocity along the up axis (jumping/falling)
    vertical_velocity: f32,
    /// Ground contact
    state: LocomotionState,
    /// Whether the last gravity pass ended on walkable ground; a jump does not clear it
    supported: bool,
    /// Seconds since last grounded
    air_time: f32,
}

impl PlayerController {
    /// Create a player controller, rejecting unusable tuning values
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let solver =
            CollideAndSlide::new(config.capsule, config.max_slope_angle, config.collision_mask);

        Ok(Self {
            config,
            solver,
            orientation: YawSmoother::default(),
            pose: Pose::default(),
            horizontal_velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            state: LocomotionState::default(),
            supported: false,
            air_time: 0.0,
        })
    }

    /// Place the player in the world at a position, at rest
    pub fn spawn(&mut self, position: Vec3) {
        self.pose = Pose::from_position(position);
        self.reset_motion();
    }

    /// Teleport the player to a position, keeping its facing
    pub fn teleport(&mut self, position: Vec3) {
        self.pose.position = position;
        self.reset_motion();
    }

    fn reset_motion(&mut self) {
        self.horizontal_velocity = Vec3::ZERO;
        self.vertical_velocity = 0.0;
        self.state = LocomotionState::Airborne;
        self.supported = false;
        self.air_time = 0.0;
        self.orientation.reset();
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Get the player's capsule base position
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.pose.yaw
    }

    pub fn rotation(&self) -> Quat {
        self.pose.rotation()
    }

    /// Facing direction on the ground plane
    pub fn forward(&self) -> Vec3 {
        self.pose.forward()
    }

    pub fn horizontal_velocity(&self) -> Vec3 {
        self.horizontal_velocity
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded()
    }

    pub fn is_jumping(&self) -> bool {
        self.state.is_jumping()
    }

    pub fn is_falling(&self) -> bool {
        self.state.is_falling()
    }

    /// Seconds since the player was last grounded
    pub fn air_time(&self) -> f32 {
        self.air_time
    }

    /// Per-frame update (variable timestep): jump triggering and air time
    pub fn frame_update(&mut self, input: &InputSnapshot, dt: f32) {
        let grounded = self.state.is_grounded();

        if input.jump_pressed && self.state.can_jump() {
            self.vertical_velocity = self.config.jump_velocity();
            self.transition(self.state.jump());
        }

        if grounded {
            self.air_time = 0.0;
        } else {
            self.air_time += dt;
            if self.air_time > self.config.falling_air_time_threshold {
                self.transition(self.state.start_falling());
            }
        }
    }

    /// Update the player (fixed timestep) and return the committed pose
    pub fn fixed_update<C>(&mut self, world: &C, input: &InputSnapshot, dt: f32) -> Pose
    where
        C: ShapeCaster + ?Sized,
    {
        let move_dir = input.move_direction;
        if move_dir.length() > MOVE_DEAD_ZONE {
            let speed = self.config.max_speed(input.run_held);
            let flat = Vec3::new(move_dir.x, 0.0, move_dir.z);
            self.horizontal_velocity += flat * speed;
            self.pose.yaw = self.orientation.turn_toward(self.pose.yaw, flat, dt);
        }

        self.horizontal_velocity =
            apply_friction(self.horizontal_velocity, self.config.ground_friction);

        // Acceleration: velocity picks up dt here, displacement picks up dt again below
        self.vertical_velocity -= self.config.gravity() * dt;

        let grounded = self.supported;
        let mut displacement = Vec3::ZERO;

        let horizontal = self.horizontal_velocity * dt;
        if horizontal != Vec3::ZERO {
            let outcome = self.solver.resolve(
                world,
                SlideRequest {
                    velocity: horizontal,
                    position: self.pose.position,
                    pass: SlidePass::Horizontal,
                    grounded,
                },
            );
            displacement += outcome.displacement;
        }

        let outcome = self.solver.resolve(
            world,
            SlideRequest {
                velocity: WORLD_UP * (self.vertical_velocity * dt),
                position: self.pose.position + displacement,
                pass: SlidePass::Gravity,
                grounded,
            },
        );
        displacement += outcome.displacement;
        self.apply_ground_contact(outcome.ground);
        self.supported = self.state.is_grounded();

        self.pose.translate(displacement);

        self.vertical_velocity = if self.state.is_grounded() {
            0.0
        } else {
            apply_friction_scalar(self.vertical_velocity, self.config.air_friction)
        };

        self.pose
    }

    fn apply_ground_contact(&mut self, contact: GroundContact) {
        match contact {
            GroundContact::Landed => {
                self.air_time = 0.0;
                self.transition(self.state.land());
            }
            GroundContact::Lost => self.transition(self.state.leave_ground()),
            GroundContact::Unchanged => {}
        }
    }

    fn transition(&mut self, next: LocomotionState) {
        if next != self.state {
            debug!(
                from = ?self.state,
                to = ?next,
                position = ?self.pose.position,
                "Locomotion state changed"
            );
            self.state = next;
        }
    }
}
