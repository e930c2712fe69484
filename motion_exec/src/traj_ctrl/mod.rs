//! # Trajectory control module
//!
//! Trajectory control keeps the robot on a path. Steering and speed are
//! handled separately and then fused:
//!
//!  - An adaptive pure pursuit controller picks a lookahead point on the path
//!    and produces the constant curvature arc which takes the robot there.
//!  - A profile follower drives the robot's linear displacement along that
//!    arc, towards the end speed planned at the lookahead point.
//!
//! The linear velocity from the profile follower is then combined with the
//! curvature of the steering arc to give the body frame velocity command.
//! Once the robot is close to the end of the path steering stops and the
//! profile follower brings it to rest.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod pure_pursuit;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::geom::Twist;
use crate::path::PathError;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use pure_pursuit::{AdaptivePurePursuitController, Command};
pub use state::{DebugOutput, PathFollower};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur when setting up trajectory control.
#[derive(Debug, thiserror::Error)]
pub enum TrajCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Could not build the path: {0}")]
    PathError(#[from] PathError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a body frame velocity into (left, right) wheel velocities for a
/// differential drive with the given track width.
pub fn wheel_speeds(twist: Twist, track_width: f64) -> (f64, f64) {
    let delta_v = track_width * twist.dtheta / 2.0;
    (twist.dx - delta_v, twist.dx + delta_v)
}
