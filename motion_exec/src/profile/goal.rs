//! Goals and constraints for motion profile generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::MotionState;
use util::maths::epsilon_equals;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default tolerance on the goal position.
pub const DEFAULT_POS_TOLERANCE: f64 = 1e-3;

/// Default tolerance on the goal velocity.
pub const DEFAULT_VEL_TOLERANCE: f64 = 1e-2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The desired end state of a motion profile.
///
/// The completion behaviour is checked on construction: `Overshoot` only
/// makes sense for goals which must be reached at (close to) zero velocity,
/// so for any other goal it is replaced with `ViolateMaxAccel`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProfileGoal {
    pos: f64,
    max_vel: f64,
    completion_behavior: CompletionBehavior,
    pos_tolerance: f64,
    vel_tolerance: f64,
}

/// Velocity and acceleration limits applied to a generated profile.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionProfileConstraints {
    max_vel: f64,
    max_acc: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What to do when the goal can't be reached within the constraints.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionBehavior {
    /// Overshoot the goal then come back to it.
    Overshoot,

    /// Decelerate harder than the constraints allow.
    ViolateMaxAccel,

    /// Arrive at the goal faster than the goal velocity.
    ViolateMaxVel,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CompletionBehavior {
    fn default() -> Self {
        CompletionBehavior::Overshoot
    }
}

impl MotionProfileGoal {
    /// A goal at `pos`, to be reached at (or below) `max_vel`.
    pub fn new(pos: f64, max_vel: f64, completion_behavior: CompletionBehavior) -> Self {
        Self::with_tolerances(
            pos,
            max_vel,
            completion_behavior,
            DEFAULT_POS_TOLERANCE,
            DEFAULT_VEL_TOLERANCE,
        )
    }

    pub fn with_tolerances(
        pos: f64,
        max_vel: f64,
        completion_behavior: CompletionBehavior,
        pos_tolerance: f64,
        vel_tolerance: f64,
    ) -> Self {
        let mut goal = Self {
            pos,
            max_vel: max_vel.abs(),
            completion_behavior,
            pos_tolerance,
            vel_tolerance,
        };

        goal.sanity_check();
        goal
    }

    /// A goal at `pos` to be reached at rest.
    pub fn from_pos(pos: f64) -> Self {
        Self::new(pos, 0.0, CompletionBehavior::Overshoot)
    }

    fn sanity_check(&mut self) {
        if self.max_vel > self.vel_tolerance
            && self.completion_behavior == CompletionBehavior::Overshoot
        {
            self.completion_behavior = CompletionBehavior::ViolateMaxAccel;
        }
    }

    pub fn pos(&self) -> f64 {
        self.pos
    }

    pub fn max_vel(&self) -> f64 {
        self.max_vel
    }

    pub fn completion_behavior(&self) -> CompletionBehavior {
        self.completion_behavior
    }

    pub fn pos_tolerance(&self) -> f64 {
        self.pos_tolerance
    }

    pub fn vel_tolerance(&self) -> f64 {
        self.vel_tolerance
    }

    /// The same goal mirrored about the position origin.
    pub fn flipped(&self) -> Self {
        Self::with_tolerances(
            -self.pos,
            self.max_vel,
            self.completion_behavior,
            self.pos_tolerance,
            self.vel_tolerance,
        )
    }

    pub fn at_goal_pos(&self, pos: f64) -> bool {
        epsilon_equals(pos, self.pos, self.pos_tolerance)
    }

    /// True if the state is at the goal position with an acceptable velocity.
    ///
    /// Any velocity is acceptable under `ViolateMaxVel`.
    pub fn at_goal_state(&self, state: &MotionState) -> bool {
        self.at_goal_pos(state.pos)
            && (state.vel.abs() < self.max_vel + self.vel_tolerance
                || self.completion_behavior == CompletionBehavior::ViolateMaxVel)
    }
}

impl Default for MotionProfileGoal {
    fn default() -> Self {
        Self::from_pos(0.0)
    }
}

impl MotionProfileConstraints {
    /// Limits are stored as absolute values.
    pub fn new(max_vel: f64, max_acc: f64) -> Self {
        Self {
            max_vel: max_vel.abs(),
            max_acc: max_acc.abs(),
        }
    }

    pub fn max_vel(&self) -> f64 {
        self.max_vel
    }

    pub fn max_acc(&self) -> f64 {
        self.max_acc
    }
}
