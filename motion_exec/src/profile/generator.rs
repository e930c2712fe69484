//! Time optimal motion profile generation
//!
//! Profiles are built from at most three constant acceleration controls:
//! accelerate to the cruise velocity, cruise, and decelerate to the goal
//! velocity. Goals behind the start state are solved in a mirrored frame.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{
    CompletionBehavior, MotionProfile, MotionProfileConstraints, MotionProfileGoal, MotionSegment,
    MotionState,
};
use util::maths::signum;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate the minimum time profile from `prev_state` to `goal`.
///
/// The profile respects `constraints` unless the goal's completion behaviour
/// allows one of them to be violated.
pub fn generate_profile(
    constraints: &MotionProfileConstraints,
    goal: &MotionProfileGoal,
    prev_state: &MotionState,
) -> MotionProfile {
    let mut delta_pos = goal.pos() - prev_state.pos;

    // Always solve for positive movement, flipping the solution if needed
    if delta_pos < 0.0 || (delta_pos == 0.0 && prev_state.vel < 0.0) {
        return generate_flipped_profile(constraints, goal, prev_state);
    }

    // Clamp the start state into the constraints
    let mut start_state = MotionState::new(
        prev_state.t,
        prev_state.pos,
        signum(prev_state.vel) * prev_state.vel.abs().min(constraints.max_vel()),
        signum(prev_state.acc) * prev_state.acc.abs().min(constraints.max_acc()),
    );

    let mut profile = MotionProfile::new();
    profile.reset(start_state);

    // Moving away from the goal, stop first
    if start_state.vel < 0.0 && delta_pos > 0.0 {
        let stopping_time = (start_state.vel / constraints.max_acc()).abs();
        profile.append_control(constraints.max_acc(), stopping_time);
        start_state = profile.end_state();
        delta_pos = goal.pos() - start_state.pos;
    }

    // From here the start velocity is non-negative
    let min_vel_at_goal_2 = start_state.vel2() - 2.0 * constraints.max_acc() * delta_pos;
    let min_vel_at_goal = min_vel_at_goal_2.abs().sqrt();
    let max_vel_at_goal =
        (start_state.vel2() + 2.0 * constraints.max_acc() * delta_pos).sqrt();

    let mut goal_vel = goal.max_vel();
    let mut max_acc = constraints.max_acc();

    if min_vel_at_goal_2 > 0.0 && min_vel_at_goal > goal.max_vel() + goal.vel_tolerance() {
        // Can't avoid overshooting the goal velocity
        match goal.completion_behavior() {
            CompletionBehavior::ViolateMaxVel => {
                goal_vel = min_vel_at_goal;
            }
            CompletionBehavior::ViolateMaxAccel => {
                if delta_pos.abs() < goal.pos_tolerance() {
                    // Already at the goal but too fast, this needs an
                    // instantaneous change in velocity
                    let end = profile.end_state();
                    profile.append_segment(MotionSegment::new(
                        MotionState::new(end.t, end.pos, end.vel, std::f64::NEG_INFINITY),
                        MotionState::new(end.t, end.pos, goal_vel, std::f64::NEG_INFINITY),
                    ));
                    profile.consolidate();
                    return profile;
                }

                max_acc = (goal_vel * goal_vel - start_state.vel2()).abs() / (2.0 * delta_pos);
            }
            CompletionBehavior::Overshoot => {
                // Stop past the goal, then come back
                let stopping_time = (start_state.vel / constraints.max_acc()).abs();
                profile.append_control(-constraints.max_acc(), stopping_time);

                let back = generate_flipped_profile(constraints, goal, &profile.end_state());
                profile.append_profile(&back);
                profile.consolidate();
                return profile;
            }
        }
    }

    // goal_vel is now reachable at the goal using no more than max_acc
    goal_vel = goal_vel.min(max_vel_at_goal);

    // The peak velocity is the intersection of the acceleration curve from
    // the start and the deceleration curve into the goal:
    //   peak^2 = v0^2 + 2*a*d_accel
    //   goal_vel^2 = peak^2 - 2*a*d_decel
    //   delta_pos = d_accel + d_decel
    let cruise_vel = constraints
        .max_vel()
        .min(((start_state.vel2() + goal_vel * goal_vel) / 2.0 + delta_pos * max_acc).sqrt());

    // Accelerate
    if cruise_vel > start_state.vel {
        let accel_time = (cruise_vel - start_state.vel) / max_acc;
        profile.append_control(max_acc, accel_time);
        start_state = profile.end_state();
    }

    let dist_decel = ((start_state.vel2() - goal_vel * goal_vel)
        / (2.0 * constraints.max_acc()))
    .max(0.0);
    let dist_cruise = (goal.pos() - start_state.pos - dist_decel).max(0.0);

    // Cruise
    if dist_cruise > 0.0 {
        let cruise_time = dist_cruise / start_state.vel;
        profile.append_control(0.0, cruise_time);
        start_state = profile.end_state();
    }

    // Decelerate
    if dist_decel > 0.0 {
        let decel_time = (start_state.vel - goal_vel) / max_acc;
        profile.append_control(-max_acc, decel_time);
    }

    profile.consolidate();
    profile
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Solve the mirrored problem and mirror the solution back.
fn generate_flipped_profile(
    constraints: &MotionProfileConstraints,
    goal: &MotionProfileGoal,
    prev_state: &MotionState,
) -> MotionProfile {
    let mut profile = generate_profile(constraints, &goal.flipped(), &prev_state.flipped());
    profile.flip();
    profile
}
