//! Building paths from waypoints
//!
//! Each corner waypoint is rounded off with an arc of the waypoint's radius,
//! tangent to the lines either side of it. The lines are shortened to meet
//! the arcs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};

// Internal
use super::{Path, PathError, PathSegment};
use crate::geom::{RigidTransform, Translation, EPSILON};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Arcs with a radius at or above this are treated as straight.
const MAX_ARC_RADIUS: f64 = 1e6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point the path should pass by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Translation,

    /// Radius of the arc used to round off the corner at this waypoint
    pub radius: f64,

    /// Speed on the way to this waypoint
    pub speed: f64,

    /// Marker recorded once the robot has passed this waypoint
    #[serde(default)]
    pub marker: Option<String>,
}

/// Straight run between two waypoints, trimmed by their corner radii.
#[derive(Debug, Clone)]
pub struct Line {
    a: Waypoint,
    b: Waypoint,
    slope: Translation,
    start: Translation,
    end: Translation,
}

/// Corner arc joining the lines either side of a waypoint.
#[derive(Debug, Clone)]
pub struct Arc {
    a: Line,
    b: Line,
    center: Translation,
    radius: f64,
    speed: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Waypoint {
    pub fn new(position: Translation, radius: f64, speed: f64) -> Self {
        Self {
            position,
            radius,
            speed,
            marker: None,
        }
    }

    pub fn with_marker(position: Translation, radius: f64, speed: f64, marker: &str) -> Self {
        Self {
            marker: Some(marker.to_string()),
            ..Self::new(position, radius, speed)
        }
    }
}

impl Line {
    pub fn new(a: &Waypoint, b: &Waypoint) -> Self {
        let slope = b.position - a.position;
        let len = slope.norm();

        let (start, end) = if len > EPSILON {
            (
                a.position + slope * (a.radius / len),
                b.position - slope * (b.radius / len),
            )
        } else {
            (a.position, b.position)
        };

        Self {
            a: a.clone(),
            b: b.clone(),
            slope,
            start,
            end,
        }
    }

    pub fn start(&self) -> Translation {
        self.start
    }

    pub fn end(&self) -> Translation {
        self.end
    }

    /// Speed along the line, taken from the waypoint it heads towards.
    pub fn speed(&self) -> f64 {
        self.b.speed
    }

    /// Append the line to the path, arriving at the end at `end_speed`.
    ///
    /// Zero length lines (fully eaten by the corner radii) are skipped.
    pub fn add_to_path(&self, path: &mut Path, end_speed: f64) {
        if (self.end - self.start).norm() <= EPSILON {
            debug!("Skipping zero length line towards {:?}", self.b.position);
            return;
        }

        let seg = PathSegment::line_with_profile(
            self.start,
            self.end,
            self.b.speed,
            path.last_motion_state(),
            end_speed,
            path.max_accel(),
            self.b.marker.clone(),
        );
        path.add_segment(seg);
    }
}

impl Arc {
    pub fn new(a: &Waypoint, b: &Waypoint, c: &Waypoint) -> Self {
        let a = Line::new(a, b);
        let b = Line::new(b, c);
        let speed = (a.speed() + b.speed()) / 2.0;

        let normal_a = RigidTransform::new(a.end, a.slope.direction().normal());
        let normal_b = RigidTransform::new(b.start, b.slope.direction().normal());
        let center = normal_a.intersection(normal_b);
        let radius = (center - a.end).norm();

        Self {
            a,
            b,
            center,
            radius,
            speed,
        }
    }

    pub fn center(&self) -> Translation {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// False if the lines are colinear or the corner radius is zero, in
    /// which case no arc is added.
    pub fn is_rounded(&self) -> bool {
        self.radius > EPSILON && self.radius < MAX_ARC_RADIUS
    }

    /// Append the incoming line and the arc to the path.
    ///
    /// The arc itself is left out if the lines are colinear or the corner
    /// radius is zero.
    pub fn add_to_path(&self, path: &mut Path) {
        self.a.add_to_path(path, self.speed);

        if self.is_rounded() {
            let seg = PathSegment::arc_with_profile(
                self.a.end,
                self.b.start,
                self.center,
                self.speed,
                path.last_motion_state(),
                self.b.speed(),
                path.max_accel(),
                self.a.b.marker.clone(),
            );
            path.add_segment(seg);
        }
    }
}

impl Path {
    /// Build a path through the given waypoints.
    ///
    /// The path comes to rest at the last waypoint, with lookahead
    /// extrapolation enabled on the final segment. Segment speeds are checked
    /// with `verify_vels` against `max_accel`.
    pub fn from_waypoints(waypoints: &[Waypoint], max_accel: f64) -> Result<Self, PathError> {
        let n = waypoints.len();
        if n < 2 {
            return Err(PathError::NotEnoughWaypoints(n));
        }

        let waypoints = flatten_unrounded(waypoints);
        let mut path = Path::new(max_accel);

        for w in waypoints.windows(3) {
            Arc::new(&w[0], &w[1], &w[2]).add_to_path(&mut path);
        }
        Line::new(&waypoints[n - 2], &waypoints[n - 1]).add_to_path(&mut path, 0.0);

        if path.is_empty() {
            return Err(PathError::NoSegments);
        }

        path.extrapolate_last();
        path.verify_vels();

        debug!(
            "Built path of {} segments, {:.3} long, from {} waypoints",
            path.len(),
            path.remaining_length(),
            n
        );

        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Copy of the waypoints with the radius zeroed wherever no corner arc will
/// be built, so the lines either side still meet at the waypoint.
fn flatten_unrounded(waypoints: &[Waypoint]) -> Vec<Waypoint> {
    let mut flat = waypoints.to_vec();
    let n = flat.len();

    for i in 1..n - 1 {
        if !Arc::new(&waypoints[i - 1], &waypoints[i], &waypoints[i + 1]).is_rounded() {
            flat[i].radius = 0.0;
        }
    }

    // The ends are never rounded
    flat[0].radius = 0.0;
    flat[n - 1].radius = 0.0;

    flat
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path::{Lookahead, SegmentShape};
    use std::f64::consts::PI;
    use util::maths::epsilon_equals;

    const EPS: f64 = 1e-6;

    fn corner_waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint::new(Translation::new(0.0, 0.0), 0.0, 10.0),
            Waypoint::with_marker(Translation::new(60.0, 0.0), 10.0, 10.0, "corner"),
            Waypoint::with_marker(Translation::new(60.0, 40.0), 0.0, 10.0, "end"),
        ]
    }

    #[test]
    fn test_corner_geometry() {
        let path = Path::from_waypoints(&corner_waypoints(), 20.0).unwrap();
        let segs: Vec<&PathSegment> = path.segments().collect();
        assert_eq!(segs.len(), 3);

        // Line up to the start of the corner
        assert!(segs[0].is_line());
        assert!(epsilon_equals(segs[0].end().x(), 50.0, EPS));
        assert_eq!(segs[0].marker(), Some("corner"));

        // Quarter circle of radius 10
        match segs[1].shape() {
            SegmentShape::Arc { center, .. } => {
                assert!(epsilon_equals(center.x(), 50.0, EPS));
                assert!(epsilon_equals(center.y(), 10.0, EPS));
            }
            SegmentShape::Line => panic!("Expected an arc"),
        }
        assert!(epsilon_equals(segs[1].length(), 5.0 * PI, EPS));
        assert_eq!(segs[1].marker(), Some("corner"));

        // Final line away from the corner
        assert!(epsilon_equals(segs[2].start().y(), 10.0, EPS));
        assert!(epsilon_equals(segs[2].length(), 30.0, EPS));
        assert_eq!(segs[2].marker(), Some("end"));

        // Speeds chain from rest to rest
        assert_eq!(segs[0].start_speed(), 0.0);
        assert!(epsilon_equals(segs[0].end_speed(), 10.0, EPS));
        assert!(epsilon_equals(segs[1].start_speed(), 10.0, EPS));
        assert!(epsilon_equals(segs[2].end_speed(), 0.0, EPS));

        assert!(epsilon_equals(path.remaining_length(), 80.0 + 5.0 * PI, EPS));

        for pair in segs.windows(2) {
            assert!(epsilon_equals((pair[0].end() - pair[1].start()).norm(), 0.0, EPS));
        }
    }

    #[test]
    fn test_not_enough_waypoints() {
        let wps = vec![Waypoint::new(Translation::identity(), 0.0, 1.0)];
        match Path::from_waypoints(&wps, 1.0) {
            Err(PathError::NotEnoughWaypoints(1)) => (),
            r => panic!("Unexpected result {:?}", r),
        }

        let wps = vec![
            Waypoint::new(Translation::new(1.0, 1.0), 0.0, 1.0),
            Waypoint::new(Translation::new(1.0, 1.0), 0.0, 1.0),
        ];
        assert!(matches!(
            Path::from_waypoints(&wps, 1.0),
            Err(PathError::NoSegments)
        ));
    }

    #[test]
    fn test_colinear_waypoints_skip_arc() {
        let wps = vec![
            Waypoint::new(Translation::new(0.0, 0.0), 0.0, 5.0),
            Waypoint::new(Translation::new(10.0, 0.0), 2.0, 5.0),
            Waypoint::new(Translation::new(20.0, 0.0), 0.0, 5.0),
        ];
        let path = Path::from_waypoints(&wps, 10.0).unwrap();
        assert_eq!(path.len(), 2);
        assert!(path.segments().all(|s| s.is_line()));

        // No arc, so the lines run right up to the waypoint
        let segs: Vec<&PathSegment> = path.segments().collect();
        assert!(epsilon_equals(segs[0].end().x(), 10.0, EPS));
        assert!(epsilon_equals((segs[0].end() - segs[1].start()).norm(), 0.0, EPS));
        assert!(epsilon_equals(path.remaining_length(), 20.0, EPS));
    }

    #[test]
    fn test_driving_the_centerline_retires_segments() {
        let mut path = Path::from_waypoints(&corner_waypoints(), 20.0).unwrap();
        let lookahead = Lookahead::new(3.0, 6.0, 0.9, 12.0);

        // Walk along the line, round the corner and up the last line
        let mut points: Vec<Translation> =
            (0..=100).map(|i| Translation::new(i as f64 * 0.5, 0.0)).collect();
        for i in 1..50 {
            let theta = -PI / 2.0 + i as f64 / 50.0 * PI / 2.0;
            points.push(Translation::new(
                50.0 + 10.0 * theta.cos(),
                10.0 + 10.0 * theta.sin(),
            ));
        }
        points.extend((0..=60).map(|i| Translation::new(60.0, 10.0 + i as f64 * 0.5)));

        let mut last_len = path.len();
        for p in points {
            if path.target_point(p, &lookahead).is_none() {
                break;
            }
            assert!(path.len() <= last_len);
            last_len = path.len();

            if last_len < 3 {
                assert!(path.has_passed_marker("corner"));
            }
        }

        assert!(path.is_empty());
        assert!(path.has_passed_marker("corner"));
        assert!(path.has_passed_marker("end"));
    }

    #[test]
    fn test_waypoints_from_toml() {
        #[derive(Deserialize)]
        struct Wps {
            waypoints: Vec<Waypoint>,
        }

        let wps: Wps = util::params::from_str(
            r#"
            [[waypoints]]
            position = { vec = [0.0, 0.0] }
            radius = 0.0
            speed = 1.0

            [[waypoints]]
            position = { vec = [3.0, 4.0] }
            radius = 0.0
            speed = 2.0
            marker = "end"
            "#,
        )
        .unwrap();

        assert_eq!(wps.waypoints.len(), 2);
        assert_eq!(wps.waypoints[0].marker, None);
        assert_eq!(wps.waypoints[1].marker.as_deref(), Some("end"));

        let path = Path::from_waypoints(&wps.waypoints, 1.0).unwrap();
        assert!(epsilon_equals(path.remaining_length(), 5.0, EPS));
    }
}
