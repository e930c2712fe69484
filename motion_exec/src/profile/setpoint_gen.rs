//! Lazily regenerated setpoint source

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{
    generate_profile, MotionProfile, MotionProfileConstraints, MotionProfileGoal, MotionState,
};
use util::maths::signum;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Caches a motion profile and samples setpoints from it.
///
/// The profile is only regenerated when the goal or constraints change, or
/// when the state handed in no longer lies on the cached profile.
#[derive(Debug, Clone, Default)]
pub struct SetpointGenerator {
    profile: MotionProfile,
    goal: Option<MotionProfileGoal>,
    constraints: Option<MotionProfileConstraints>,
}

/// A state to track, and whether it is the last one of the profile.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Setpoint {
    pub motion_state: MotionState,
    pub final_setpoint: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Setpoint {
    pub fn new(motion_state: MotionState, final_setpoint: bool) -> Self {
        Self {
            motion_state,
            final_setpoint,
        }
    }
}

impl Default for Setpoint {
    /// An invalid, non-final setpoint.
    fn default() -> Self {
        Self::new(MotionState::invalid(), false)
    }
}

impl SetpointGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the cached profile, forcing a regeneration on the next call.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The currently cached (and trimmed) profile.
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Get the setpoint at time `t`.
    ///
    /// `prev_state` should be the previously returned setpoint, or the
    /// measured state if there isn't one.
    pub fn setpoint(
        &mut self,
        constraints: &MotionProfileConstraints,
        goal: &MotionProfileGoal,
        prev_state: &MotionState,
        t: f64,
    ) -> Setpoint {
        let mut regenerate =
            self.constraints.as_ref() != Some(constraints) || self.goal.as_ref() != Some(goal);

        if !regenerate && !self.profile.is_empty() {
            regenerate = match self.profile.state_by_time(prev_state.t) {
                Some(expected) => !expected.equals(prev_state),
                None => true,
            };
        }

        if regenerate {
            self.constraints = Some(*constraints);
            self.goal = Some(*goal);
            self.profile = generate_profile(constraints, goal, prev_state);

            debug!(
                "Regenerated profile to {:.3} from {:?}: {} segments over {:.3} s",
                goal.pos(),
                prev_state,
                self.profile.len(),
                self.profile.duration()
            );
        }

        // Invalid or empty profiles just hold the previous state
        let mut setpoint = Setpoint::new(*prev_state, true);

        if !self.profile.is_empty() && self.profile.is_valid() {
            if let Some(state) = self.profile.state_by_time_clamped(t) {
                self.profile.trim_before_time(t);

                setpoint = Setpoint::new(
                    state,
                    self.profile.is_empty() || goal.at_goal_state(&state),
                );
            }
        }

        // Final setpoints sit exactly on the goal
        if setpoint.final_setpoint {
            let s = setpoint.motion_state;
            setpoint.motion_state = MotionState::new(
                s.t,
                goal.pos(),
                signum(s.vel) * goal.max_vel().max(s.vel.abs()),
                0.0,
            );
        }

        trace!("Setpoint at {:.3}: {:?}", t, setpoint);

        setpoint
    }
}
