//! # Path module
//!
//! A path is a queue of line and arc segments laid end to end. Each segment
//! carries its own speed profile over distance along it, so the planned speed
//! anywhere on the path can be read off without reference to time.
//!
//! The path is consumed as the robot drives it: every call to `target_point`
//! finds the robot's closest point on the front segment, looks ahead along
//! the path by a speed dependent distance to find the steering target, and
//! retires the front segment once the robot is within
//! `SEGMENT_COMPLETION_TOLERANCE` of its end. Markers attached to retired
//! segments are remembered so that callers can trigger actions at points
//! along the path.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod builder;
mod lookahead;
mod segment;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};

// Internal
use crate::geom::Translation;
use crate::profile::MotionState;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use builder::{Arc, Line, Waypoint};
pub use lookahead::Lookahead;
pub use segment::{PathSegment, SegmentShape};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distance from the end of a segment within which it is considered done.
pub const SEGMENT_COMPLETION_TOLERANCE: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An ordered sequence of segments to follow.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Path {
    segments: VecDeque<PathSegment>,

    /// Markers of segments which have been completed
    markers_crossed: BTreeSet<String>,

    /// Acceleration limit used when checking the segment speeds
    max_accel: f64,
}

/// The result of a target point query.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TargetPointReport {
    /// Point on the current segment closest to the robot
    pub closest_point: Translation,

    /// Distance from the robot to `closest_point`
    pub closest_point_distance: f64,

    /// Planned speed at `closest_point`
    pub closest_point_speed: f64,

    /// The steering target
    pub lookahead_point: Translation,

    /// Planned speed at the lookahead point
    pub lookahead_point_speed: f64,

    /// Maximum speed of the segment containing the lookahead point
    pub max_speed: f64,

    /// Distance left on the current segment from `closest_point`
    pub remaining_segment_distance: f64,

    /// Distance left on the whole path from `closest_point`
    pub remaining_path_distance: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("At least two waypoints are needed to build a path, got {0}")]
    NotEnoughWaypoints(usize),

    #[error("All segments between the waypoints were degenerate")]
    NoSegments,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create an empty path.
    ///
    /// `max_accel` is the acceleration used to build segment speed profiles
    /// and in `verify_vels`.
    pub fn new(max_accel: f64) -> Self {
        Self {
            segments: VecDeque::new(),
            markers_crossed: BTreeSet::new(),
            max_accel: max_accel.abs(),
        }
    }

    pub fn max_accel(&self) -> f64 {
        self.max_accel
    }

    /// Add a segment to the end of the path.
    pub fn add_segment(&mut self, segment: PathSegment) {
        self.segments.push_back(segment);
    }

    /// Number of segments left in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Read only view of the remaining segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// End point of the final segment.
    pub fn end_pos(&self) -> Option<Translation> {
        self.segments.back().map(|s| s.end())
    }

    /// The speed state at the end of the path, with position and time reset
    /// to zero so it can start the next segment's profile. Zero for an empty
    /// path.
    pub fn last_motion_state(&self) -> MotionState {
        match self.segments.back() {
            Some(seg) => {
                let end = seg.end_state();
                MotionState::new(0.0, 0.0, end.vel, end.acc)
            }
            None => MotionState::default(),
        }
    }

    /// Distance from `robot_pos`'s closest point to the end of the current
    /// segment.
    pub fn segment_remaining_dist(&self, robot_pos: Translation) -> f64 {
        match self.segments.front() {
            Some(seg) => seg.remaining_distance(seg.closest_point(robot_pos)),
            None => 0.0,
        }
    }

    /// Length of the current segment.
    pub fn segment_length(&self) -> f64 {
        self.segments.front().map_or(0.0, |s| s.length())
    }

    /// Total length of all remaining segments.
    pub fn remaining_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length()).sum()
    }

    /// Planned speed at the point on the current segment closest to
    /// `robot_pos`.
    pub fn vel_by_pos(&self, robot_pos: Translation) -> f64 {
        self.segments
            .front()
            .map_or(0.0, |s| s.speed_by_closest_point(robot_pos))
    }

    /// Enable lookahead extrapolation on the final segment so the steering
    /// target can run past the end of the path.
    pub fn extrapolate_last(&mut self) {
        if let Some(seg) = self.segments.back_mut() {
            seg.set_extrapolate_lookahead(true);
        }
    }

    /// True if a segment with the given marker has been completed.
    pub fn has_passed_marker(&self, marker: &str) -> bool {
        self.markers_crossed.contains(marker)
    }

    /// Retire the current segment, recording its marker.
    pub fn remove_current_segment(&mut self) {
        if let Some(seg) = self.segments.pop_front() {
            debug!(
                "Completed path segment ending at ({:.3}, {:.3}), marker {:?}, {} left",
                seg.end().x(),
                seg.end().y(),
                seg.marker(),
                self.segments.len()
            );

            if let Some(marker) = seg.marker() {
                self.markers_crossed.insert(marker.to_string());
            }
        }
    }

    /// Retire the current segment if `robot_pos` is close enough to its end.
    pub fn check_segment_done(&mut self, robot_pos: Translation) {
        if let Some(seg) = self.segments.front() {
            let remaining = seg.remaining_distance(seg.closest_point(robot_pos));

            if remaining < SEGMENT_COMPLETION_TOLERANCE {
                self.remove_current_segment();
            }
        }
    }

    /// Make sure every segment can be entered at its planned speed and still
    /// slow down in time for the rest of the path.
    ///
    /// Walking backwards from the end, each segment's start speed is limited
    /// to `sqrt(v_next^2 + 2 * a * length)`. All speed profiles are then
    /// rebuilt forwards so each one starts from the end of the previous.
    pub fn verify_vels(&mut self) {
        let n = self.segments.len();
        let mut start_vels = vec![0.0; n + 1];

        let mut max_start_vel = 0.0_f64;
        for i in (0..n).rev() {
            let seg = &self.segments[i];
            max_start_vel =
                (max_start_vel * max_start_vel + 2.0 * self.max_accel * seg.length()).sqrt();
            start_vels[i] = seg.start_speed().min(max_start_vel);
            max_start_vel = start_vels[i];
        }

        let mut start_state = MotionState::default();
        for (i, seg) in self.segments.iter_mut().enumerate() {
            seg.create_speed_profile(start_state, start_vels[i + 1], self.max_accel);

            let end = seg.end_state();
            start_state = MotionState::new(0.0, 0.0, end.vel, end.acc);
        }
    }

    /// Find the steering target for a robot at `robot_pos`.
    ///
    /// The lookahead distance is taken from `lookahead` at the planned speed
    /// of the robot's closest point, plus the robot's distance from the path.
    /// If it runs past the end of the current segment the search carries on
    /// into the following ones. The current segment is retired afterwards if
    /// the robot has reached its end.
    ///
    /// Returns `None` if the path is empty.
    pub fn target_point(
        &mut self,
        robot_pos: Translation,
        lookahead: &Lookahead,
    ) -> Option<TargetPointReport> {
        let current = self.segments.front()?;

        let closest_point = current.closest_point(robot_pos);
        let closest_point_distance = (closest_point - robot_pos).norm();
        let remaining_segment_distance = current.remaining_distance(closest_point);
        let remaining_path_distance = remaining_segment_distance
            + self.segments.iter().skip(1).map(|s| s.length()).sum::<f64>();
        let closest_point_speed =
            current.speed_by_distance(current.length() - remaining_segment_distance);

        let mut lookahead_dist =
            lookahead.lookahead_by_vel(closest_point_speed) + closest_point_distance;

        let mut lookahead_seg = current;
        if remaining_segment_distance < lookahead_dist && self.segments.len() > 1 {
            lookahead_dist -= remaining_segment_distance;

            for (i, seg) in self.segments.iter().enumerate().skip(1) {
                lookahead_seg = seg;
                if seg.length() < lookahead_dist && i < self.segments.len() - 1 {
                    lookahead_dist -= seg.length();
                } else {
                    break;
                }
            }
        } else {
            lookahead_dist += current.length() - remaining_segment_distance;
        }

        let report = TargetPointReport {
            closest_point,
            closest_point_distance,
            closest_point_speed,
            lookahead_point: lookahead_seg.point_by_distance(lookahead_dist),
            lookahead_point_speed: lookahead_seg.speed_by_distance(lookahead_dist),
            max_speed: lookahead_seg.max_speed(),
            remaining_segment_distance,
            remaining_path_distance,
        };

        self.check_segment_done(closest_point);

        Some(report)
    }
}
