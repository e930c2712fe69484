//! Adaptive pure pursuit steering

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use crate::geom::{Interpolate, Pose, RigidTransform, Rotation, Translation, Twist};
use crate::path::{Lookahead, Path};
use util::maths::signum;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lookahead speeds below this count as stopping at the lookahead point.
const STOP_VEL_EPSILON: f64 = 1e-6;

/// Radii at or above this are treated as straight lines.
const MAX_RADIUS: f64 = 1e6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Steers along a path by driving constant curvature arcs towards a lookahead
/// point, with the lookahead distance adapted to the planned speed.
#[derive(Debug, Clone)]
pub struct AdaptivePurePursuitController {
    path: Path,
    reversed: bool,
    lookahead: Lookahead,
    at_end_of_path: bool,
}

/// The output of one pure pursuit update.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Command {
    /// Arc to the lookahead point in the robot frame
    pub delta: Twist,

    /// Distance from the robot to the path
    pub cross_track_error: f64,

    /// Maximum speed of the segment containing the lookahead point
    pub max_vel: f64,

    /// Speed to be at when the arc is complete
    pub end_vel: f64,

    pub lookahead_point: Translation,

    /// Path length left from the robot's closest point
    pub remaining_path_length: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AdaptivePurePursuitController {
    /// Create a new controller which takes ownership of the path.
    ///
    /// If `reversed` the robot drives the path backwards.
    pub fn new(path: Path, reversed: bool, lookahead: Lookahead) -> Self {
        Self {
            path,
            reversed,
            lookahead,
            at_end_of_path: false,
        }
    }

    /// Get the steering command for the current pose.
    pub fn update(&mut self, pose: Pose) -> Command {
        let pose = if self.reversed {
            RigidTransform::new(
                pose.translation(),
                pose.rotation()
                    .rotate_by(Rotation::from_radians(std::f64::consts::PI)),
            )
        } else {
            pose
        };

        let report = match self.path.target_point(pose.translation(), &self.lookahead) {
            Some(r) => r,
            None => {
                if !self.at_end_of_path {
                    debug!("Path exhausted, stopping");
                }
                self.at_end_of_path = true;

                return Command {
                    delta: Twist::identity(),
                    cross_track_error: 0.0,
                    max_vel: 0.0,
                    end_vel: 0.0,
                    lookahead_point: pose.translation(),
                    remaining_path_length: 0.0,
                };
            }
        };

        if self.at_end_of_path {
            return Command {
                delta: Twist::identity(),
                cross_track_error: report.closest_point_distance,
                max_vel: report.max_speed,
                end_vel: 0.0,
                lookahead_point: report.lookahead_point,
                remaining_path_length: report.remaining_path_distance,
            };
        }

        let (radius, length) = arc_to(&pose, report.lookahead_point);

        // Shorten the final arc so we stop at the end of the path
        let mut scale = 1.0;
        if report.lookahead_point_speed < STOP_VEL_EPSILON
            && report.remaining_path_distance < length
        {
            scale = (report.remaining_path_distance / length).max(0.0);
            self.at_end_of_path = true;
            debug!(
                "Reached end of path, {:.3} remaining",
                report.remaining_path_distance
            );
        }

        if self.reversed {
            scale = -scale;
        }

        let direction = turn_direction(&pose, report.lookahead_point);

        let cmd = Command {
            delta: Twist::new(
                scale * length,
                0.0,
                length * direction * scale.abs() / radius,
            ),
            cross_track_error: report.closest_point_distance,
            max_vel: report.max_speed,
            end_vel: report.lookahead_point_speed * signum(scale),
            lookahead_point: report.lookahead_point,
            remaining_path_length: report.remaining_path_distance,
        };

        trace!("Pure pursuit command: {:?}", cmd);

        cmd
    }

    /// True once the end of the path has been reached.
    pub fn is_finished(&self) -> bool {
        self.at_end_of_path
    }

    pub fn has_passed_marker(&self, marker: &str) -> bool {
        self.path.has_passed_marker(marker)
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Read only view of what is left of the path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Center of the circle tangent to the pose's heading which passes through
/// `point`.
///
/// If `point` lies straight ahead the midpoint is returned, giving an
/// infinite radius.
fn arc_center(pose: &Pose, point: Translation) -> Translation {
    let halfway = pose.translation().interpolate(&point, 0.5);
    let normal = (halfway - pose.translation()).direction().normal();

    let bisector = RigidTransform::new(halfway, normal);
    let normal_from_pose = RigidTransform::new(pose.translation(), pose.rotation().normal());

    if normal_from_pose.is_colinear(bisector.normal()) {
        halfway
    } else {
        normal_from_pose.intersection(bisector)
    }
}

/// Radius and length of the arc from the pose to `point`.
fn arc_to(pose: &Pose, point: Translation) -> (f64, f64) {
    let center = arc_center(pose, point);
    let radius = (point - center).norm();

    let length = if radius < MAX_RADIUS {
        let to_point = point - pose.translation();
        let behind = signum(Translation::cross(
            pose.rotation().normal().to_translation(),
            to_point,
        )) > 0.0;

        let angle = Translation::angle_between(point - center, pose.translation() - center)
            .radians()
            .abs();

        if behind {
            radius * (2.0 * std::f64::consts::PI - angle)
        } else {
            radius * angle
        }
    } else {
        (point - pose.translation()).norm()
    };

    (radius, length)
}

/// +1 if `point` is to the left of the pose's heading, -1 if to the right.
fn turn_direction(pose: &Pose, point: Translation) -> f64 {
    let to_point = point - pose.translation();
    if Translation::cross(pose.rotation().to_translation(), to_point) < 0.0 {
        -1.0
    } else {
        1.0
    }
}
