//! Velocity dependent lookahead distance

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{clamp, lin_map};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Maps the planned speed at the robot's closest point on the path onto a
/// lookahead distance, looking further ahead at higher speeds.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookahead {
    /// Lookahead distance used at or below `min_vel`
    pub min_dist: f64,

    /// Lookahead distance used at or above `max_vel`
    pub max_dist: f64,

    pub min_vel: f64,
    pub max_vel: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Lookahead {
    pub fn new(min_dist: f64, max_dist: f64, min_vel: f64, max_vel: f64) -> Self {
        Self {
            min_dist,
            max_dist,
            min_vel,
            max_vel,
        }
    }

    /// Get the lookahead distance for the given speed.
    ///
    /// Linear between the two calibration points, clamped to
    /// `[min_dist, max_dist]`. A NaN result (e.g. from a zero width velocity
    /// range) falls back to `min_dist`.
    pub fn lookahead_by_vel(&self, vel: f64) -> f64 {
        let dist = lin_map(
            (self.min_vel, self.max_vel),
            (self.min_dist, self.max_dist),
            vel,
        );

        if dist.is_nan() {
            return self.min_dist;
        }

        clamp(dist, self.min_dist, self.max_dist)
    }
}
