//! # Motion control library.
//!
//! The motion control core of the robot. Given a path, or a single
//! displacement goal, it produces velocity and curvature commands which
//! respect the robot's velocity and acceleration limits, correcting against
//! the measured state every control cycle.
//!
//! Everything here is called synchronously from a single periodic control
//! task. Nothing blocks, and nothing is shared between threads.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Geometry - translations, rotations, poses and twists in the plane
pub mod geom;

/// Motion profiles - one dimensional trajectory generation and sampling
pub mod profile;

/// Profile control - follows a motion profile to a displacement goal
pub mod prof_ctrl;

/// Path - line and arc segments with planned speeds along them
pub mod path;

/// Trajectory control - keeps the robot on a path
pub mod traj_ctrl;
