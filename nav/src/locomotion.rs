//! Locomotion state and facing of a single agent.
//!
//! Rules:
//! - `Idle` and `Running` follow whether the body moved this step.
//! - `Kicking` is entered on a kick request and left only through [`Locomotion::complete_kick`],
//!   which the animation/timing collaborator calls when the kick finishes. Movement does not
//!   leave it.
//! - `Disabled` is set and cleared only by the game-phase collaborator.

use crate::collision::{settings::DIST_EPS, types::Quat, types::Vec3};
use crate::geometry::facing_from_direction;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    #[default]
    Idle,
    Running,
    Kicking,
    Disabled,
}

impl LocomotionState {
    /// Whether movement updates may change the state.
    #[inline]
    pub fn follows_motion(self) -> bool {
        matches!(self, LocomotionState::Idle | LocomotionState::Running)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Locomotion {
    state: LocomotionState,
    facing: Quat,
}

impl Locomotion {
    pub fn new(facing: Quat) -> Self {
        Self {
            state: LocomotionState::Idle,
            facing,
        }
    }

    #[inline]
    pub fn state(&self) -> LocomotionState {
        self.state
    }

    #[inline]
    pub fn facing(&self) -> Quat {
        self.facing
    }

    /// Update `Idle`/`Running` from the step's motion. No-op while kicking or disabled.
    pub fn apply_motion(&mut self, moved: bool) {
        if !self.state.follows_motion() {
            return;
        }
        self.state = if moved {
            LocomotionState::Running
        } else {
            LocomotionState::Idle
        };
    }

    /// Enter `Kicking`. Returns `false` (and changes nothing) if already kicking or disabled.
    pub fn request_kick(&mut self) -> bool {
        if !self.state.follows_motion() {
            return false;
        }
        self.state = LocomotionState::Kicking;
        true
    }

    /// Leave `Kicking`. Ignored in any other state.
    pub fn complete_kick(&mut self) {
        if self.state == LocomotionState::Kicking {
            self.state = LocomotionState::Idle;
        }
    }

    /// Enter or leave `Disabled`. Leaving always lands in `Idle`.
    pub fn set_disabled(&mut self, disabled: bool) {
        match (disabled, self.state) {
            (true, _) => self.state = LocomotionState::Disabled,
            (false, LocomotionState::Disabled) => self.state = LocomotionState::Idle,
            (false, _) => {}
        }
    }

    /// Turn a fraction `t` of the way toward the planar direction `dir`.
    ///
    /// A direction with no planar part leaves the facing unchanged.
    pub fn face_toward(&mut self, dir: Vec3, t: f32) {
        let Some(goal) = facing_from_direction(dir) else {
            return;
        };
        self.facing = self
            .facing
            .try_slerp(&goal, t.clamp(0.0, 1.0), DIST_EPS)
            .unwrap_or(goal);
    }

    /// Back to `Idle` with the given facing.
    pub fn reset(&mut self, facing: Quat) {
        self.state = LocomotionState::Idle;
        self.facing = facing;
    }
}
