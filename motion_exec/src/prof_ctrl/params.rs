//! Profile follower parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Feedback and feedforward gains of the profile follower
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct ProfileGains {
    /// Position error proportional gain
    pub kp: f64,

    /// Position error integral gain
    pub ki: f64,

    /// Velocity error proportional gain
    pub kv: f64,

    /// Velocity feedforward gain
    pub kffv: f64,

    /// Acceleration feedforward gain
    pub kffa: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileGains {
    pub fn new(kp: f64, ki: f64, kv: f64, kffv: f64, kffa: f64) -> Self {
        Self {
            kp,
            ki,
            kv,
            kffv,
            kffa,
        }
    }
}
