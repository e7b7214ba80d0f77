//! Ground contact state
//!
//! Grounded, jumping and falling form one closed state so that a character
//! can never be grounded and falling at once.

use serde::{Deserialize, Serialize};

/// Contact state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocomotionState {
    /// Standing on walkable ground
    Grounded,
    /// Launched by a jump and not yet landed
    Jumping {
        /// Airborne longer than the falling threshold
        falling: bool,
    },
    /// Left the ground without jumping
    #[default]
    Airborne,
    /// Airborne without jumping for longer than the falling threshold
    Falling,
}

impl LocomotionState {
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::Grounded)
    }

    pub fn is_jumping(self) -> bool {
        matches!(self, Self::Jumping { .. })
    }

    pub fn is_falling(self) -> bool {
        matches!(self, Self::Falling | Self::Jumping { falling: true })
    }

    /// A jump can only start from the ground
    pub fn can_jump(self) -> bool {
        self.is_grounded()
    }

    /// Touched walkable ground
    pub fn land(self) -> Self {
        Self::Grounded
    }

    /// Nothing below any more
    pub fn leave_ground(self) -> Self {
        match self {
            Self::Grounded => Self::Airborne,
            other => other,
        }
    }

    /// Jump impulse applied
    pub fn jump(self) -> Self {
        match self {
            Self::Grounded => Self::Jumping { falling: false },
            other => other,
        }
    }

    /// Air time passed the falling threshold
    pub fn start_falling(self) -> Self {
        match self {
            Self::Airborne => Self::Falling,
            Self::Jumping { .. } => Self::Jumping { falling: true },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_cycle() {
        let state = LocomotionState::Grounded.jump();
        assert!(state.is_jumping());
        assert!(!state.is_grounded());
        assert!(!state.is_falling());

        let state = state.start_falling();
        assert!(state.is_jumping());
        assert!(state.is_falling());

        let state = state.land();
        assert_eq!(state, LocomotionState::Grounded);
        assert!(!state.is_jumping());
        assert!(!state.is_falling());
    }

    #[test]
    fn test_walk_off_ledge() {
        let state = LocomotionState::Grounded.leave_ground();
        assert_eq!(state, LocomotionState::Airborne);
        assert!(!state.is_falling());
        assert_eq!(state.start_falling(), LocomotionState::Falling);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        assert_eq!(LocomotionState::Airborne.jump(), LocomotionState::Airborne);
        assert_eq!(LocomotionState::Grounded.start_falling(), LocomotionState::Grounded);
        assert_eq!(
            LocomotionState::Jumping { falling: false }.leave_ground(),
            LocomotionState::Jumping { falling: false }
        );
    }

    #[test]
    fn test_grounded_never_falling() {
        let all = [
            LocomotionState::Grounded,
            LocomotionState::Jumping { falling: false },
            LocomotionState::Jumping { falling: true },
            LocomotionState::Airborne,
            LocomotionState::Falling,
        ];
        for state in all {
            assert!(!(state.is_grounded() && state.is_falling()));
            assert!(!(state.is_grounded() && state.is_jumping()));
        }
    }
}
