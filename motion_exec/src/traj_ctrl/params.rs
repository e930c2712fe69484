//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::TrajCtrlError;
use crate::path::Lookahead;
use crate::prof_ctrl::ProfileGains;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the path follower
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Params {
    /// Speed to lookahead distance mapping used by pure pursuit
    pub lookahead: Lookahead,

    /// Scales up the turn rate with speed to make up for the robot's
    /// rotational inertia
    pub inertia_gain: f64,

    /// Gains of the profile follower driving the linear velocity
    pub gains: ProfileGains,

    /// Maximum linear velocity of the robot
    pub profile_max_vel: f64,

    /// Maximum linear acceleration of the robot
    pub profile_max_acc: f64,

    /// Position tolerance of the profile goal
    pub goal_pos_tolerance: f64,

    /// Velocity tolerance of the profile goal
    pub goal_vel_tolerance: f64,

    /// Remaining path length below which steering stops and the profile
    /// follower brings the robot to rest on its own
    pub stop_steering_distance: f64,

    /// Acceleration limit used to build and check path speeds
    pub path_max_accel: f64,

    /// Distance between the left and right wheels
    pub track_width: f64,

    /// Lower limit on the velocity command
    #[serde(default)]
    pub min_output: Option<f64>,

    /// Upper limit on the velocity command
    #[serde(default)]
    pub max_output: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters make sense.
    pub fn validate(&self) -> Result<(), TrajCtrlError> {
        let positive = [
            ("profile_max_vel", self.profile_max_vel),
            ("profile_max_acc", self.profile_max_acc),
            ("path_max_accel", self.path_max_accel),
            ("track_width", self.track_width),
        ];

        for (name, value) in positive.iter() {
            if !(*value > 0.0) {
                return Err(TrajCtrlError::InvalidParams(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.lookahead.min_dist > self.lookahead.max_dist {
            return Err(TrajCtrlError::InvalidParams(format!(
                "Lookahead min_dist ({}) is greater than max_dist ({})",
                self.lookahead.min_dist, self.lookahead.max_dist
            )));
        }

        if self.lookahead.min_vel > self.lookahead.max_vel {
            return Err(TrajCtrlError::InvalidParams(format!(
                "Lookahead min_vel ({}) is greater than max_vel ({})",
                self.lookahead.min_vel, self.lookahead.max_vel
            )));
        }

        if let (Some(min), Some(max)) = (self.min_output, self.max_output) {
            if min > max {
                return Err(TrajCtrlError::InvalidParams(format!(
                    "min_output ({}) is greater than max_output ({})",
                    min, max
                )));
            }
        }

        Ok(())
    }
}
