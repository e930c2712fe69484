//! # Geometry
//!
//! Planar geometry primitives used by the path and trajectory modules. All
//! angles are radians unless a function says otherwise.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod rigid_transform;
mod rotation;
mod translation;
mod twist;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use rigid_transform::*;
pub use rotation::*;
pub use translation::*;
pub use twist::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used for near-zero checks throughout the geometry kernel.
pub const EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Something which can be blended with another of its kind.
pub trait Interpolate {
    /// Interpolate between `self` (at `x = 0`) and `other` (at `x = 1`).
    ///
    /// `x` outside of `[0, 1]` is clamped.
    fn interpolate(&self, other: &Self, x: f64) -> Self;
}
