//! Line and arc path segments

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;

// Internal
use crate::geom::{Rotation, Translation, EPSILON};
use crate::profile::{
    generate_profile, CompletionBehavior, MotionProfile, MotionProfileConstraints,
    MotionProfileGoal, MotionState,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A line or circular arc joining two points, with the speed along it held
/// as a motion profile over distance travelled along the segment.
#[derive(Debug, Clone, Serialize)]
pub struct PathSegment {
    start: Translation,
    end: Translation,
    shape: SegmentShape,

    max_speed: f64,

    /// Allow `point_by_distance` to run past the end of the segment
    extrapolate_lookahead: bool,

    /// Name passed to the path when this segment is completed
    marker: Option<String>,

    /// Speed profile indexed by position along the segment. The profile's
    /// time axis has no meaning.
    speed_profile: MotionProfile,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The geometry joining the start and end of a segment.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum SegmentShape {
    Line,

    /// Arc about `center`, `delta_start` and `delta_end` are the vectors from
    /// the center to the start and end points.
    Arc {
        center: Translation,
        delta_start: Translation,
        delta_end: Translation,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathSegment {
    /// Create a straight line segment.
    ///
    /// The speed profile is left empty, use `create_speed_profile` to fill
    /// it.
    pub fn line(
        start: Translation,
        end: Translation,
        max_speed: f64,
        marker: Option<String>,
    ) -> Self {
        Self {
            start,
            end,
            shape: SegmentShape::Line,
            max_speed,
            extrapolate_lookahead: false,
            marker,
            speed_profile: MotionProfile::new(),
        }
    }

    /// Create an arc segment about `center`.
    ///
    /// `start` and `end` should be the same distance from the center. The
    /// shorter of the two possible arcs is used.
    pub fn arc(
        start: Translation,
        end: Translation,
        center: Translation,
        max_speed: f64,
        marker: Option<String>,
    ) -> Self {
        Self {
            start,
            end,
            shape: SegmentShape::Arc {
                center,
                delta_start: start - center,
                delta_end: end - center,
            },
            max_speed,
            extrapolate_lookahead: false,
            marker,
            speed_profile: MotionProfile::new(),
        }
    }

    /// Build a line segment along with its speed profile.
    pub fn line_with_profile(
        start: Translation,
        end: Translation,
        max_speed: f64,
        start_state: MotionState,
        end_speed: f64,
        max_accel: f64,
        marker: Option<String>,
    ) -> Self {
        let mut seg = Self::line(start, end, max_speed, marker);
        seg.create_speed_profile(start_state, end_speed, max_accel);
        seg
    }

    /// Build an arc segment along with its speed profile.
    #[allow(clippy::too_many_arguments)]
    pub fn arc_with_profile(
        start: Translation,
        end: Translation,
        center: Translation,
        max_speed: f64,
        start_state: MotionState,
        end_speed: f64,
        max_accel: f64,
        marker: Option<String>,
    ) -> Self {
        let mut seg = Self::arc(start, end, center, max_speed, marker);
        seg.create_speed_profile(start_state, end_speed, max_accel);
        seg
    }

    /// (Re)generate the speed profile of the segment, starting from
    /// `start_state` and arriving at the end of the segment at `end_speed`.
    pub fn create_speed_profile(&mut self, start_state: MotionState, end_speed: f64, max_accel: f64) {
        let constraints = MotionProfileConstraints::new(self.max_speed, max_accel);
        let goal = MotionProfileGoal::new(self.length(), end_speed, CompletionBehavior::Overshoot);

        self.speed_profile = generate_profile(&constraints, &goal, &start_state);
    }

    pub fn start(&self) -> Translation {
        self.start
    }

    pub fn end(&self) -> Translation {
        self.end
    }

    pub fn shape(&self) -> SegmentShape {
        self.shape
    }

    pub fn is_line(&self) -> bool {
        self.shape == SegmentShape::Line
    }

    /// Center of the arc, `None` for lines.
    pub fn center(&self) -> Option<Translation> {
        match self.shape {
            SegmentShape::Line => None,
            SegmentShape::Arc { center, .. } => Some(center),
        }
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn speed_profile(&self) -> &MotionProfile {
        &self.speed_profile
    }

    /// The state at the end of the speed profile.
    pub fn end_state(&self) -> MotionState {
        self.speed_profile.end_state()
    }

    pub fn start_speed(&self) -> f64 {
        self.speed_profile.start_state().vel
    }

    pub fn end_speed(&self) -> f64 {
        self.speed_profile.end_state().vel
    }

    /// Allow lookahead points past the end of this segment.
    pub fn set_extrapolate_lookahead(&mut self, value: bool) {
        self.extrapolate_lookahead = value;
    }

    /// Distance along the segment from start to end.
    pub fn length(&self) -> f64 {
        match self.shape {
            SegmentShape::Line => (self.end - self.start).norm(),
            SegmentShape::Arc {
                delta_start,
                delta_end,
                ..
            } => {
                delta_start.norm()
                    * Translation::angle_between(delta_start, delta_end).radians()
            }
        }
    }

    /// The point on the segment closest to `pos`.
    ///
    /// For arcs, positions whose projection onto the circle falls outside the
    /// swept angle map to the nearer endpoint.
    pub fn closest_point(&self, pos: Translation) -> Translation {
        match self.shape {
            SegmentShape::Line => {
                let delta = self.end - self.start;
                let len2 = Translation::dot(delta, delta);

                if len2 <= EPSILON {
                    return self.start;
                }

                let u = Translation::dot(pos - self.start, delta) / len2;
                if u < 0.0 {
                    self.start
                } else if u > 1.0 {
                    self.end
                } else {
                    self.start + delta * u
                }
            }
            SegmentShape::Arc {
                center,
                delta_start,
                delta_end,
            } => {
                let delta_pos = pos - center;
                let dist = delta_pos.norm();

                let sense = Translation::cross(
                    delta_start.direction().to_translation(),
                    delta_end.direction().to_translation(),
                );

                if dist > EPSILON && sense.abs() > EPSILON {
                    let on_circle = delta_pos.scale(delta_start.norm() / dist);

                    // Inside the sweep when the radius through pos is turned
                    // the same way from the start as the end is, and the end
                    // is turned that way from it
                    if Translation::cross(delta_start, on_circle) * sense >= 0.0
                        && Translation::cross(on_circle, delta_end) * sense >= 0.0
                    {
                        return center + on_circle;
                    }
                }

                if (self.end - pos).norm() < (self.start - pos).norm() {
                    self.end
                } else {
                    self.start
                }
            }
        }
    }

    /// The point `dist` along the segment from its start.
    ///
    /// Clamped to the end of the segment unless lookahead extrapolation is
    /// enabled.
    pub fn point_by_distance(&self, dist: f64) -> Translation {
        let length = self.length();
        let dist = if !self.extrapolate_lookahead && dist > length {
            length
        } else {
            dist
        };

        if length <= EPSILON {
            return self.start;
        }

        match self.shape {
            SegmentShape::Line => self.start + (self.end - self.start) * (dist / length),
            SegmentShape::Arc {
                center,
                delta_start,
                delta_end,
            } => {
                let sweep = Translation::angle_between(delta_start, delta_end).radians();
                let sense = if Translation::cross(delta_start, delta_end) >= 0.0 {
                    1.0
                } else {
                    -1.0
                };

                center + delta_start.rotate_by(Rotation::from_radians(sweep * sense * dist / length))
            }
        }
    }

    /// Distance left along the segment from `pos`, which should lie on the
    /// segment.
    pub fn remaining_distance(&self, pos: Translation) -> f64 {
        match self.shape {
            SegmentShape::Line => (self.end - pos).norm(),
            SegmentShape::Arc {
                center,
                delta_start,
                delta_end,
            } => {
                let sweep = Translation::angle_between(delta_start, delta_end).radians();
                if sweep <= EPSILON {
                    return 0.0;
                }

                let left = Translation::angle_between(delta_end, pos - center).radians();
                left / sweep * self.length()
            }
        }
    }

    /// Distance from the start of the segment to the point closest to `pos`.
    pub fn distance_travelled(&self, pos: Translation) -> f64 {
        self.length() - self.remaining_distance(self.closest_point(pos))
    }

    /// Planned speed at `dist` along the segment.
    pub fn speed_by_distance(&self, dist: f64) -> f64 {
        let profile = &self.speed_profile;

        let dist = if dist < profile.start_pos() {
            profile.start_pos()
        } else if dist > profile.end_pos() {
            profile.end_pos()
        } else {
            dist
        };

        match profile.first_state_by_pos(dist) {
            Some(state) => state.vel,
            None => {
                warn!("Velocity does not exist at position {:.4} along segment", dist);
                0.0
            }
        }
    }

    /// Planned speed at the point on the segment closest to `pos`.
    pub fn speed_by_closest_point(&self, pos: Translation) -> f64 {
        self.speed_by_distance(self.distance_travelled(pos))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use util::maths::epsilon_equals;

    const EPS: f64 = 1e-6;

    fn pt_eq(a: Translation, b: Translation) -> bool {
        epsilon_equals(a.x(), b.x(), EPS) && epsilon_equals(a.y(), b.y(), EPS)
    }

    fn quarter_arc() -> PathSegment {
        PathSegment::arc_with_profile(
            Translation::new(50.0, 0.0),
            Translation::new(60.0, 10.0),
            Translation::new(50.0, 10.0),
            10.0,
            MotionState::default(),
            10.0,
            20.0,
            None,
        )
    }

    #[test]
    fn test_line() {
        let seg = PathSegment::line_with_profile(
            Translation::new(0.0, 0.0),
            Translation::new(10.0, 0.0),
            5.0,
            MotionState::default(),
            0.0,
            10.0,
            Some(String::from("a")),
        );

        assert_eq!(seg.length(), 10.0);
        assert!(seg.is_line());
        assert_eq!(seg.center(), None);
        assert_eq!(seg.marker(), Some("a"));

        // Projection, and clamping onto the ends
        assert!(pt_eq(seg.closest_point(Translation::new(4.0, 3.0)), Translation::new(4.0, 0.0)));
        assert!(pt_eq(seg.closest_point(Translation::new(-4.0, 3.0)), seg.start()));
        assert!(pt_eq(seg.closest_point(Translation::new(14.0, -3.0)), seg.end()));

        assert!(pt_eq(seg.point_by_distance(2.5), Translation::new(2.5, 0.0)));
        assert!(pt_eq(seg.point_by_distance(20.0), seg.end()));
        assert_eq!(seg.remaining_distance(Translation::new(2.5, 0.0)), 7.5);
        assert_eq!(seg.distance_travelled(Translation::new(2.5, 1.0)), 2.5);
    }

    #[test]
    fn test_line_extrapolation() {
        let mut seg = PathSegment::line(
            Translation::new(0.0, 0.0),
            Translation::new(0.0, 10.0),
            5.0,
            None,
        );
        seg.set_extrapolate_lookahead(true);
        assert!(pt_eq(seg.point_by_distance(12.0), Translation::new(0.0, 12.0)));
    }

    #[test]
    fn test_arc() {
        let seg = quarter_arc();

        assert!(!seg.is_line());
        assert!(epsilon_equals(seg.length(), 5.0 * std::f64::consts::PI, EPS));

        // Halfway round
        let mid = seg.point_by_distance(seg.length() / 2.0);
        let half = std::f64::consts::FRAC_1_SQRT_2 * 10.0;
        assert!(pt_eq(mid, Translation::new(50.0 + half, 10.0 - half)));
        assert!(epsilon_equals(seg.remaining_distance(mid), seg.length() / 2.0, EPS));

        // Radial projection inside the swept angle
        let closest = seg.closest_point(Translation::new(70.0, 0.0));
        assert!(epsilon_equals((closest - Translation::new(50.0, 10.0)).norm(), 10.0, EPS));
        assert!(epsilon_equals(closest.x(), 50.0 + 20.0 / 5f64.sqrt(), EPS));

        // Outside the swept angle snaps to the nearer end
        assert!(pt_eq(seg.closest_point(Translation::new(30.0, 5.0)), seg.start()));
        assert!(pt_eq(seg.closest_point(Translation::new(55.0, 30.0)), seg.end()));

        // Ends
        assert!(pt_eq(seg.point_by_distance(0.0), seg.start()));
        assert!(pt_eq(seg.point_by_distance(seg.length()), seg.end()));
    }

    #[test]
    fn test_arc_far_side_clamps() {
        let seg = quarter_arc();

        // Across the circle from the arc, nearer the start
        let pos = Translation::new(40.0, 18.0);
        assert!(pt_eq(seg.closest_point(pos), seg.start()));
        assert!(epsilon_equals(seg.distance_travelled(pos), 0.0, EPS));
        assert!(epsilon_equals(seg.remaining_distance(seg.closest_point(pos)), seg.length(), EPS));

        // Across the circle, nearer the end
        let pos = Translation::new(42.0, 22.0);
        assert!(pt_eq(seg.closest_point(pos), seg.end()));
        assert!(epsilon_equals(seg.distance_travelled(pos), seg.length(), EPS));

        // Anywhere around the circle stays on the arc
        for i in 0..36 {
            let angle = (i as f64 * 10.0).to_radians();
            let pos = Translation::new(50.0 + 15.0 * angle.cos(), 10.0 + 15.0 * angle.sin());
            let travelled = seg.distance_travelled(pos);
            assert!(travelled >= -EPS && travelled <= seg.length() + EPS);
        }
    }

    #[test]
    fn test_arc_clockwise() {
        let seg = PathSegment::arc(
            Translation::new(0.0, 10.0),
            Translation::new(10.0, 0.0),
            Translation::new(0.0, 0.0),
            1.0,
            None,
        );

        let mid = seg.point_by_distance(seg.length() / 2.0);
        let half = std::f64::consts::FRAC_1_SQRT_2 * 10.0;
        assert!(pt_eq(mid, Translation::new(half, half)));
    }

    #[test]
    fn test_speed_by_distance() {
        let seg = quarter_arc();

        // Starts at rest, accelerates at 20 then holds 10
        assert_eq!(seg.start_speed(), 0.0);
        assert!(epsilon_equals(seg.speed_by_distance(0.1), 2.0, EPS));
        assert!(epsilon_equals(seg.speed_by_distance(5.0), 10.0, EPS));
        assert!(epsilon_equals(seg.end_speed(), 10.0, EPS));

        // Out of range queries clamp
        assert_eq!(seg.speed_by_distance(-1.0), 0.0);
        assert!(epsilon_equals(seg.speed_by_distance(100.0), 10.0, EPS));

        // No profile
        let bare = PathSegment::line(Translation::identity(), Translation::new(1.0, 0.0), 1.0, None);
        assert_eq!(bare.speed_by_distance(0.5), 0.0);
    }
}
