//! Path follower state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use serde::Serialize;

// Internal
use super::{AdaptivePurePursuitController, Params, TrajCtrlError};
use crate::geom::{Pose, Twist, EPSILON};
use crate::path::{Path, Waypoint};
use crate::prof_ctrl::ProfileFollower;
use crate::profile::{
    CompletionBehavior, MotionProfileConstraints, MotionProfileGoal, MotionState,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Curvatures at or above this are treated as a turn on the spot.
const MAX_CURVATURE: f64 = 1e6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Follows a path by fusing pure pursuit steering with a profile follower
/// on the linear displacement.
pub struct PathFollower {
    params: Params,

    steering_controller: AdaptivePurePursuitController,
    velocity_controller: ProfileFollower,

    /// Steering arc from the previous cycle. The velocity command is shaped
    /// with this rather than the arc computed in the current cycle, giving a
    /// one cycle lag on steering.
    last_steering_delta: Option<Twist>,

    done_steering: bool,
    force_finished: bool,

    debug_output: DebugOutput,

    arch_debug: Archiver,
}

/// Per cycle record of the path follower, for archiving.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct DebugOutput {
    pub t: f64,
    pub pose_x: f64,
    pub pose_y: f64,
    pub pose_theta_rad: f64,
    pub linear_displacement: f64,
    pub linear_velocity: f64,
    pub profile_displacement: f64,
    pub profile_velocity: f64,
    pub velocity_command_dx: f64,
    pub velocity_command_dy: f64,
    pub velocity_command_dtheta: f64,
    pub steering_command_dx: f64,
    pub steering_command_dy: f64,
    pub steering_command_dtheta: f64,
    pub cross_track_error: f64,
    pub along_track_error: f64,
    pub lookahead_point_x: f64,
    pub lookahead_point_y: f64,
    pub lookahead_point_velocity: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathFollower {
    /// Create a new follower for the given path.
    ///
    /// If `reversed` the path is driven backwards.
    pub fn new(path: Path, reversed: bool, params: &Params) -> Self {
        let mut velocity_controller = ProfileFollower::new(params.gains);
        velocity_controller.set_constraints(MotionProfileConstraints::new(
            params.profile_max_vel,
            params.profile_max_acc,
        ));
        if let Some(min) = params.min_output {
            velocity_controller.set_min_output(min);
        }
        if let Some(max) = params.max_output {
            velocity_controller.set_max_output(max);
        }

        Self {
            params: params.clone(),
            steering_controller: AdaptivePurePursuitController::new(
                path,
                reversed,
                params.lookahead,
            ),
            velocity_controller,
            last_steering_delta: None,
            done_steering: false,
            force_finished: false,
            debug_output: DebugOutput::default(),
            arch_debug: Archiver::default(),
        }
    }

    /// Start archiving the debug output into the session.
    pub fn init_archive(&mut self, session: &Session) -> Result<(), ArchiveError> {
        self.arch_debug = Archiver::from_path(session, "traj_ctrl/debug_output.csv")?;
        Ok(())
    }

    /// Load the parameters, relative to the params directory, and build a
    /// follower along a path through the given waypoints.
    pub fn from_params_file(
        params_path: &str,
        waypoints: &[Waypoint],
        reversed: bool,
    ) -> Result<Self, TrajCtrlError> {
        let params: Params = params::load(params_path)?;
        params.validate()?;

        let path = Path::from_waypoints(waypoints, params.path_max_accel)?;

        info!(
            "Following path of {} segments ({:.3} long){}",
            path.len(),
            path.remaining_length(),
            if reversed { " in reverse" } else { "" }
        );

        Ok(Self::new(path, reversed, &params))
    }

    /// Run one control cycle and get the body frame velocity command.
    ///
    /// `displacement` and `velocity` are the robot's linear displacement and
    /// velocity as measured by odometry.
    pub fn update(&mut self, t: f64, pose: Pose, displacement: f64, velocity: f64) -> Twist {
        let mut steering_delta = None;

        if !self.is_steering_finished() {
            let cmd = self.steering_controller.update(pose);
            steering_delta = Some(cmd.delta);

            self.debug_output.lookahead_point_x = cmd.lookahead_point.x();
            self.debug_output.lookahead_point_y = cmd.lookahead_point.y();
            self.debug_output.lookahead_point_velocity = cmd.end_vel;
            self.debug_output.steering_command_dx = cmd.delta.dx;
            self.debug_output.steering_command_dy = cmd.delta.dy;
            self.debug_output.steering_command_dtheta = cmd.delta.dtheta;
            self.debug_output.cross_track_error = cmd.cross_track_error;

            self.velocity_controller.set_goal_and_constraints(
                MotionProfileGoal::with_tolerances(
                    displacement + cmd.delta.dx,
                    cmd.end_vel.abs(),
                    CompletionBehavior::ViolateMaxAccel,
                    self.params.goal_pos_tolerance,
                    self.params.goal_vel_tolerance,
                ),
                MotionProfileConstraints::new(
                    self.params.profile_max_vel.min(cmd.max_vel),
                    self.params.profile_max_acc,
                ),
            );

            if cmd.remaining_path_length < self.params.stop_steering_distance {
                debug!(
                    "Stopped steering with {:.3} of the path remaining",
                    cmd.remaining_path_length
                );
                self.done_steering = true;
            }
        }

        let velocity_command = self
            .velocity_controller
            .update(MotionState::new(t, displacement, velocity, 0.0), t);
        let setpoint = self.velocity_controller.setpoint();

        self.debug_output.t = t;
        self.debug_output.pose_x = pose.translation().x();
        self.debug_output.pose_y = pose.translation().y();
        self.debug_output.pose_theta_rad = pose.rotation().radians();
        self.debug_output.linear_displacement = displacement;
        self.debug_output.linear_velocity = velocity;
        self.debug_output.profile_displacement = setpoint.pos;
        self.debug_output.profile_velocity = setpoint.vel;
        self.debug_output.along_track_error = self.velocity_controller.pos_error();

        // Shape the command with the previous cycle's arc, or this cycle's on
        // the first one
        let delta = self
            .last_steering_delta
            .or(steering_delta)
            .unwrap_or_else(Twist::identity);
        if steering_delta.is_some() {
            self.last_steering_delta = steering_delta;
        }

        let twist = self.fuse(delta, velocity_command, setpoint.vel);

        self.debug_output.velocity_command_dx = twist.dx;
        self.debug_output.velocity_command_dy = twist.dy;
        self.debug_output.velocity_command_dtheta = twist.dtheta;

        trace!(
            "Path follower at {:.3}: cmd {:?}, xtrack {:.4}, atrack {:.4}",
            t,
            twist,
            self.debug_output.cross_track_error,
            self.debug_output.along_track_error
        );

        twist
    }

    /// Scale the steering arc to the commanded linear velocity, keeping its
    /// curvature.
    fn fuse(&self, delta: Twist, velocity_command: f64, setpoint_vel: f64) -> Twist {
        if delta.dx.abs() < EPSILON {
            return Twist::new(velocity_command, 0.0, 0.0);
        }

        let mut dtheta = delta.dtheta;
        if let Some(curvature) = delta.curvature() {
            if curvature.abs() < MAX_CURVATURE {
                dtheta = delta.dx
                    * curvature
                    * (1.0 + self.params.inertia_gain * setpoint_vel.abs());
            }
        }

        let scale = velocity_command / delta.dx;
        Twist::new(delta.dx * scale, delta.dy * scale, dtheta * scale)
    }

    /// Distance from the robot to the path in the latest cycle.
    pub fn cross_track_error(&self) -> f64 {
        self.debug_output.cross_track_error
    }

    /// Difference between the planned and actual displacement in the latest
    /// cycle.
    pub fn along_track_error(&self) -> f64 {
        self.debug_output.along_track_error
    }

    /// The record of the latest cycle.
    pub fn debug(&self) -> DebugOutput {
        self.debug_output
    }

    fn is_steering_finished(&self) -> bool {
        self.done_steering || self.steering_controller.is_finished()
    }

    /// True once steering has finished and the robot has come to rest at the
    /// end of the path, or `force_finish` was called.
    pub fn is_finished(&self) -> bool {
        (self.is_steering_finished()
            && self.velocity_controller.is_finished_profile()
            && self.velocity_controller.on_target())
            || self.force_finished
    }

    pub fn force_finish(&mut self) {
        self.force_finished = true;
    }

    pub fn has_passed_marker(&self, marker: &str) -> bool {
        self.steering_controller.has_passed_marker(marker)
    }

    /// Read only view of what is left of the path.
    pub fn path(&self) -> &Path {
        self.steering_controller.path()
    }
}

impl Archived for PathFollower {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_debug.serialise(self.debug_output)
    }
}
