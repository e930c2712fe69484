//! Piecewise constant acceleration trajectory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// Internal
use super::{MotionSegment, MotionState, EPSILON};
use util::maths::epsilon_equals;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 1D trajectory made of consecutive constant acceleration segments.
///
/// Segments are consumed from the front as time advances (see
/// [`MotionProfile::trim_before_time`]) and appended at the back while the
/// profile is being generated.
///
/// Start/end accessors return [`MotionState::invalid`] for an empty profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionProfile {
    segments: VecDeque<MotionSegment>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments<I: IntoIterator<Item = MotionSegment>>(segments: I) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Every segment is valid and each segment starts where the previous one
    /// ended.
    pub fn is_valid(&self) -> bool {
        let mut prev: Option<&MotionSegment> = None;

        for seg in self.segments.iter() {
            if !seg.is_valid() {
                return false;
            }

            if let Some(p) = prev {
                if !p.end().coincident(&seg.start()) {
                    return false;
                }
            }

            prev = Some(seg);
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &MotionSegment> {
        self.segments.iter()
    }

    /// Get the state at time `t`.
    ///
    /// Times within the default tolerance outside of the profile snap onto
    /// the start or end state. Returns `None` for times the profile doesn't
    /// cover.
    pub fn state_by_time(&self, t: f64) -> Option<MotionState> {
        let (start, end) = (self.segments.front()?, self.segments.back()?);

        if t < start.start().t && t + EPSILON >= start.start().t {
            return Some(start.start());
        }
        if t > end.end().t && t - EPSILON <= end.end().t {
            return Some(end.end());
        }

        self.segments
            .iter()
            .find(|s| s.contains_time(t))
            .map(|s| s.start().extrapolate(t))
    }

    /// Get the state at time `t`, clamping times outside of the profile to
    /// the start or end state.
    pub fn state_by_time_clamped(&self, t: f64) -> Option<MotionState> {
        let (start, end) = (self.segments.front()?, self.segments.back()?);

        if t < start.start().t {
            return Some(start.start());
        }
        if t > end.end().t {
            return Some(end.end());
        }

        self.segments
            .iter()
            .find(|s| s.contains_time(t))
            .map(|s| s.start().extrapolate(t))
    }

    /// Get the first state in the profile at which the given position is
    /// reached.
    pub fn first_state_by_pos(&self, pos: f64) -> Option<MotionState> {
        let seg = self.segments.iter().find(|s| s.contains_pos(pos))?;

        if epsilon_equals(seg.end().pos, pos, EPSILON) {
            return Some(seg.end());
        }

        let t = match seg.start().next_time_at_pos(pos) {
            Some(t) => t.min(seg.end().t),
            None => seg.end().t,
        };

        Some(seg.start().extrapolate(t))
    }

    /// Remove all parts of the profile before time `t`.
    pub fn trim_before_time(&mut self, t: f64) {
        while let Some(seg) = self.segments.front() {
            if seg.end().t <= t {
                self.segments.pop_front();
            } else {
                break;
            }
        }

        if let Some(seg) = self.segments.front_mut() {
            if seg.start().t <= t {
                let trimmed = seg.start().extrapolate(t);
                seg.set_start(trimmed);
            }
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Replace the profile with a single zero length segment at `state`.
    pub fn reset(&mut self, state: MotionState) {
        self.clear();
        self.segments.push_back(MotionSegment::new(state, state));
    }

    /// Remove any zero length segments, leaving at least one segment.
    pub fn consolidate(&mut self) {
        let mut i = 0;

        while i < self.segments.len() && self.segments.len() > 1 {
            if self.segments[i].start().coincident(&self.segments[i].end()) {
                self.segments.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Append a segment applying `acc` for `dt` from the current end state.
    pub fn append_control(&mut self, acc: f64, dt: f64) {
        if self.is_empty() {
            warn!("Cannot append a control to an empty profile");
            return;
        }

        let last_end = self.end_state();
        let start = MotionState::new(last_end.t, last_end.pos, last_end.vel, acc);

        self.append_segment(MotionSegment::new(start, start.extrapolate(start.t + dt)));
    }

    pub fn append_segment(&mut self, segment: MotionSegment) {
        self.segments.push_back(segment);
    }

    pub fn append_profile(&mut self, profile: &MotionProfile) {
        for seg in profile.segments() {
            self.append_segment(*seg);
        }
    }

    /// Mirror every segment about the position origin.
    pub fn flip(&mut self) {
        for seg in self.segments.iter_mut() {
            *seg = MotionSegment::new(seg.start().flipped(), seg.end().flipped());
        }
    }

    pub fn start_state(&self) -> MotionState {
        self.segments
            .front()
            .map(|s| s.start())
            .unwrap_or_else(MotionState::invalid)
    }

    pub fn start_time(&self) -> f64 {
        self.start_state().t
    }

    pub fn start_pos(&self) -> f64 {
        self.start_state().pos
    }

    pub fn end_state(&self) -> MotionState {
        self.segments
            .back()
            .map(|s| s.end())
            .unwrap_or_else(MotionState::invalid)
    }

    pub fn end_time(&self) -> f64 {
        self.end_state().t
    }

    pub fn end_pos(&self) -> f64 {
        self.end_state().pos
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Total distance travelled, counting motion in either direction.
    pub fn length(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| (s.end().pos - s.start().pos).abs())
            .sum()
    }
}
