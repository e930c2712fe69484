//! # Motion profiles
//!
//! One dimensional trajectories made of constant acceleration segments, the
//! generator which builds minimum time profiles under velocity and
//! acceleration constraints, and the setpoint generator which samples them
//! each control cycle.
//!
//! Path segments query their profiles by position rather than time, using
//! them to hold speed as a function of distance along the segment.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod generator;
mod goal;
mod motion_profile;
mod segment;
mod setpoint_gen;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use generator::generate_profile;
pub use goal::*;
pub use motion_profile::MotionProfile;
pub use segment::MotionSegment;
pub use setpoint_gen::{Setpoint, SetpointGenerator};
pub use state::MotionState;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when comparing motion states.
pub const EPSILON: f64 = 1e-6;
