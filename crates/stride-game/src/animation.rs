//! Animation parameters derived from the player controller

use serde::{Deserialize, Serialize};

use crate::player::PlayerController;

/// Values an animation graph reads each frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationParams {
    /// Movement along the facing direction: -1..1 walking, -2/0/2 running
    pub forward_value: f32,
    pub falling: bool,
    pub jumping: bool,
    pub grounded: bool,
}

impl AnimationParams {
    /// Sample the controller's current state
    pub fn sample(player: &PlayerController, running: bool) -> Self {
        let heading = player.horizontal_velocity().normalize_or_zero();
        let forward_value = heading.dot(player.forward());
        let forward_value = if running {
            forward_value.round() * 2.0
        } else {
            forward_value
        };

        Self {
            forward_value,
            falling: player.is_falling(),
            jumping: player.is_jumping(),
            grounded: player.is_grounded(),
        }
    }
}
