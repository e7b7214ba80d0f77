//! Input system with action-based mapping
//!
//! Device-facing code records which actions are held or were pressed. The
//! controller only ever sees an [`InputSnapshot`] built from that state.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use stride_core::WORLD_UP;

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Run modifier (Left Shift by default)
    Run,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action going down
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Record an action going up
    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Raw movement axes: x is right/left, y is forward/backward
    pub fn move_axes(&self) -> Vec2 {
        let axis = |positive, negative| {
            let mut value = 0.0;
            if self.is_held(positive) {
                value += 1.0;
            }
            if self.is_held(negative) {
                value -= 1.0;
            }
            value
        };
        Vec2::new(
            axis(InputAction::MoveRight, InputAction::MoveLeft),
            axis(InputAction::MoveForward, InputAction::MoveBackward),
        )
    }

    /// Build the controller input for this frame, relative to the camera's facing
    pub fn snapshot(&self, camera_forward: Vec3) -> InputSnapshot {
        InputSnapshot {
            jump_pressed: self.is_just_pressed(InputAction::Jump),
            run_held: self.is_held(InputAction::Run),
            move_direction: camera_relative_move(self.move_axes(), camera_forward),
        }
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

/// Input handed to the player controller each frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Jump went down this frame
    pub jump_pressed: bool,
    /// Run modifier is held
    pub run_held: bool,
    /// Camera-relative movement direction on the ground plane, unit length or zero
    pub move_direction: Vec3,
}

/// Rotate raw movement axes into world space using the camera's ground-plane facing.
///
/// The camera's pitch is discarded, so looking down does not slow movement.
pub fn camera_relative_move(axes: Vec2, camera_forward: Vec3) -> Vec3 {
    let forward = (camera_forward - WORLD_UP * camera_forward.dot(WORLD_UP)).normalize_or_zero();
    let right = WORLD_UP.cross(forward);
    (right * axes.x + forward * axes.y).normalize_or_zero()
}
