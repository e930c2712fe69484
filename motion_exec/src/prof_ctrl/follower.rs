//! Profile follower state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::ProfileGains;
use crate::profile::{
    CompletionBehavior, MotionProfileConstraints, MotionProfileGoal, MotionState, Setpoint,
    SetpointGenerator,
};
use util::maths::{clamp, signum};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracks a motion profile towards a goal using feedback on position and
/// velocity error plus velocity and acceleration feedforward.
///
/// The follower feeds its own previous setpoint back into the setpoint
/// generator rather than the measured state, so the plan isn't disturbed by
/// measurement noise.
#[derive(Debug, Clone)]
pub struct ProfileFollower {
    gains: ProfileGains,

    min_output: f64,
    max_output: f64,

    latest_actual_state: MotionState,
    initial_state: MotionState,
    latest_pos_error: f64,
    latest_vel_error: f64,

    /// Integral of the position error
    total_error: f64,

    goal: MotionProfileGoal,
    constraints: MotionProfileConstraints,
    setpoint_generator: SetpointGenerator,
    latest_setpoint: Setpoint,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileFollower {
    /// Create a new follower with the given gains and unlimited output.
    pub fn new(gains: ProfileGains) -> Self {
        Self {
            gains,
            min_output: std::f64::NEG_INFINITY,
            max_output: std::f64::INFINITY,
            latest_actual_state: MotionState::invalid(),
            initial_state: MotionState::invalid(),
            latest_pos_error: std::f64::NAN,
            latest_vel_error: std::f64::NAN,
            total_error: 0.0,
            goal: MotionProfileGoal::default(),
            constraints: MotionProfileConstraints::default(),
            setpoint_generator: SetpointGenerator::new(),
            latest_setpoint: Setpoint::default(),
        }
    }

    pub fn set_gains(&mut self, gains: ProfileGains) {
        self.gains = gains;
    }

    pub fn gains(&self) -> ProfileGains {
        self.gains
    }

    /// Forget everything apart from the gains and output limits.
    pub fn reset_profile(&mut self) {
        *self = Self {
            min_output: self.min_output,
            max_output: self.max_output,
            ..Self::new(self.gains)
        };
    }

    /// Set a new goal and constraints.
    ///
    /// If the goal changes after a final setpoint was reached the follower is
    /// no longer considered finished.
    pub fn set_goal_and_constraints(
        &mut self,
        goal: MotionProfileGoal,
        constraints: MotionProfileConstraints,
    ) {
        if self.goal != goal && self.latest_setpoint.motion_state.is_valid() {
            self.latest_setpoint.final_setpoint = false;
        }

        self.goal = goal;
        self.constraints = constraints;
    }

    pub fn set_goal(&mut self, goal: MotionProfileGoal) {
        self.set_goal_and_constraints(goal, self.constraints);
    }

    pub fn goal(&self) -> MotionProfileGoal {
        self.goal
    }

    pub fn set_constraints(&mut self, constraints: MotionProfileConstraints) {
        self.constraints = constraints;
    }

    pub fn constraints(&self) -> MotionProfileConstraints {
        self.constraints
    }

    /// The latest setpoint state, invalid if no setpoint has been produced.
    pub fn setpoint(&self) -> MotionState {
        self.latest_setpoint.motion_state
    }

    /// Restart the profile from the next measured state.
    pub fn reset_setpoint(&mut self) {
        self.latest_setpoint = Setpoint::default();
    }

    pub fn reset_integral(&mut self) {
        self.total_error = 0.0;
    }

    pub fn set_min_output(&mut self, min_output: f64) {
        self.min_output = min_output;
    }

    pub fn set_max_output(&mut self, max_output: f64) {
        self.max_output = max_output;
    }

    /// Run one control cycle, returning the output command.
    ///
    /// The integral only accumulates while the output (without the integral
    /// term) is within the output limits, and is reset as soon as it leaves
    /// them.
    pub fn update(&mut self, latest_state: MotionState, t: f64) -> f64 {
        self.latest_actual_state = latest_state;

        let prev_state = if self.latest_setpoint.motion_state.is_valid() {
            self.latest_setpoint.motion_state
        } else {
            self.initial_state = latest_state;
            latest_state
        };

        let dt = (t - prev_state.t).max(0.0);

        self.latest_setpoint =
            self.setpoint_generator
                .setpoint(&self.constraints, &self.goal, &prev_state, t);
        let setpoint = self.latest_setpoint.motion_state;

        self.latest_pos_error = setpoint.pos - latest_state.pos;
        self.latest_vel_error = setpoint.vel - latest_state.vel;

        // Feedback and feedforward
        let acc_ff = if setpoint.acc.is_nan() {
            0.0
        } else {
            self.gains.kffa * setpoint.acc
        };
        let mut output = self.gains.kp * self.latest_pos_error
            + self.gains.kv * self.latest_vel_error
            + self.gains.kffv * setpoint.vel
            + acc_ff;

        // Integral with anti-windup
        if output >= self.min_output && output <= self.max_output {
            self.total_error += self.latest_pos_error * dt;
            output += self.gains.ki * self.total_error;
        } else {
            self.total_error = 0.0;
        }

        let output = clamp(output, self.min_output, self.max_output);

        trace!(
            "Profile follower: pos_err {:.4}, vel_err {:.4}, output {:.4}",
            self.latest_pos_error,
            self.latest_vel_error,
            output
        );

        output
    }

    pub fn pos_error(&self) -> f64 {
        self.latest_pos_error
    }

    pub fn vel_error(&self) -> f64 {
        self.latest_vel_error
    }

    /// The accumulated position error integral.
    pub fn total_error(&self) -> f64 {
        self.total_error
    }

    /// True once the setpoint generator has produced its final setpoint.
    pub fn is_finished_profile(&self) -> bool {
        self.latest_setpoint.final_setpoint
    }

    /// True if the measured state satisfies the goal.
    ///
    /// Except under `Overshoot`, having crossed the goal since the profile
    /// started also counts.
    pub fn on_target(&self) -> bool {
        if !self.latest_setpoint.motion_state.is_valid() {
            return false;
        }

        let goal_to_start = self.goal.pos() - self.initial_state.pos;
        let goal_to_actual = self.goal.pos() - self.latest_actual_state.pos;
        let passed_goal = signum(goal_to_start) * signum(goal_to_actual) < 0.0;

        self.goal.at_goal_state(&self.latest_actual_state)
            || (self.goal.completion_behavior() != CompletionBehavior::Overshoot && passed_goal)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use util::maths::epsilon_equals;

    fn follower() -> ProfileFollower {
        let mut f = ProfileFollower::new(ProfileGains::new(0.5, 0.1, 0.1, 1.0, 0.0));
        f.set_goal_and_constraints(
            MotionProfileGoal::new(10.0, 0.0, CompletionBehavior::ViolateMaxAccel),
            MotionProfileConstraints::new(5.0, 5.0),
        );
        f
    }

    #[test]
    fn test_tracks_to_goal() {
        let mut f = follower();
        let dt = 0.01;
        let mut state = MotionState::default();

        assert!(!f.on_target());

        for i in 1..1000 {
            let t = i as f64 * dt;
            let cmd = f.update(state, t);

            // Perfect velocity actuator
            state = MotionState::new(t, state.pos + cmd * dt, cmd, 0.0);

            if f.is_finished_profile() && f.on_target() {
                break;
            }
        }

        assert!(f.is_finished_profile());
        assert!(f.on_target());
        assert!(epsilon_equals(state.pos, 10.0, 0.05));
        assert_eq!(f.setpoint().pos, 10.0);
    }

    #[test]
    fn test_output_limits_and_anti_windup() {
        let mut f = ProfileFollower::new(ProfileGains::new(10.0, 1.0, 0.0, 1.0, 0.0));
        f.set_goal_and_constraints(
            MotionProfileGoal::new(100.0, 0.0, CompletionBehavior::ViolateMaxAccel),
            MotionProfileConstraints::new(10.0, 10.0),
        );
        f.set_max_output(1.0);
        f.set_min_output(-1.0);

        // Robot stuck at the origin, so the output saturates
        let stuck = |t: f64| MotionState::new(t, 0.0, 0.0, 0.0);

        f.update(stuck(0.0), 0.0);
        for i in 1..50 {
            let t = i as f64 * 0.02;
            let out = f.update(stuck(t), t);
            assert!(out <= 1.0);

            if f.pos_error() > 0.2 {
                assert_eq!(out, 1.0);
                assert_eq!(f.total_error(), 0.0);
            }
        }

        // Integral accumulates within the limits
        f.reset_profile();
        f.set_goal_and_constraints(
            MotionProfileGoal::new(0.01, 0.0, CompletionBehavior::ViolateMaxAccel),
            MotionProfileConstraints::new(10.0, 10.0),
        );
        f.update(stuck(0.0), 0.0);
        f.update(stuck(0.5), 0.5);
        assert!(f.total_error() > 0.0);
        f.reset_integral();
        assert_eq!(f.total_error(), 0.0);
    }

    #[test]
    fn test_passing_goal_is_on_target() {
        let mut f = follower();

        f.update(MotionState::new(0.0, 0.0, 0.0, 0.0), 0.0);
        assert!(!f.on_target());

        // Measured state is past the goal and still moving fast
        f.update(MotionState::new(0.1, 12.0, 5.0, 0.0), 0.1);
        assert!(f.on_target());

        // Not under overshoot
        let mut f = follower();
        f.set_goal(MotionProfileGoal::from_pos(10.0));
        f.update(MotionState::new(0.0, 0.0, 0.0, 0.0), 0.0);
        f.update(MotionState::new(0.1, 12.0, 5.0, 0.0), 0.1);
        assert!(!f.on_target());
    }

    #[test]
    fn test_goal_change_clears_final() {
        let mut f = follower();
        let mut t = 0.0;
        while !f.is_finished_profile() && t < 20.0 {
            t += 0.05;
            let sp = f.setpoint();
            let state = if sp.is_valid() { sp } else { MotionState::default() };
            f.update(MotionState::new(t, state.pos, state.vel, 0.0), t);
        }
        assert!(f.is_finished_profile());

        f.set_goal(MotionProfileGoal::new(20.0, 0.0, CompletionBehavior::ViolateMaxAccel));
        assert!(!f.is_finished_profile());

        // Same goal again doesn't change anything
        let goal = f.goal();
        f.set_goal(goal);
        assert!(!f.is_finished_profile());
        assert_eq!(f.gains().kp, 0.5);
    }
}
