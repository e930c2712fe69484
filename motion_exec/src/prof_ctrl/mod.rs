//! # Profile control module
//!
//! Drives a single degree of freedom along a motion profile towards a goal.
//! Each cycle the follower samples a setpoint from the (lazily regenerated)
//! profile and combines proportional feedback on the position and velocity
//! errors, an integral of the position error, and feedforward of the setpoint
//! velocity and acceleration into a single bounded output.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod follower;
pub mod params;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use follower::ProfileFollower;
pub use params::ProfileGains;
