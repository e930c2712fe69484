//! Constant acceleration piece of a motion profile

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::{MotionState, EPSILON};
use util::maths::{epsilon_equals, signum};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pair of states joined by constant acceleration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSegment {
    start: MotionState,
    end: MotionState,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionSegment {
    pub fn new(start: MotionState, end: MotionState) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> MotionState {
        self.start
    }

    pub fn end(&self) -> MotionState {
        self.end
    }

    pub fn set_start(&mut self, start: MotionState) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: MotionState) {
        self.end = end;
    }

    /// Check that the segment is internally consistent:
    ///
    /// - The acceleration is constant.
    /// - The velocity does not change sign, unless one end is stationary.
    /// - Extrapolating the start to the end time gives the end state. Zero
    ///   length segments with infinite acceleration are exempt.
    pub fn is_valid(&self) -> bool {
        if !epsilon_equals(self.start.acc, self.end.acc, EPSILON) {
            return false;
        }

        if signum(self.start.vel) * signum(self.end.vel) < 0.0
            && !epsilon_equals(self.start.vel, 0.0, EPSILON)
            && !epsilon_equals(self.end.vel, 0.0, EPSILON)
        {
            return false;
        }

        if !self.start.extrapolate(self.end.t).equals(&self.end) {
            // An instantaneous velocity change is allowed
            return self.start.t == self.end.t && self.start.acc.is_infinite();
        }

        true
    }

    /// True if `t` lies within the segment, inclusive of both ends.
    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.start.t && t <= self.end.t
    }

    /// True if `pos` lies within the segment, inclusive of both ends.
    pub fn contains_pos(&self, pos: f64) -> bool {
        (pos >= self.start.pos && pos <= self.end.pos)
            || (pos <= self.start.pos && pos >= self.end.pos)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validity() {
        let start = MotionState::new(0.0, 0.0, 0.0, 1.0);
        assert!(MotionSegment::new(start, start.extrapolate(2.0)).is_valid());

        // Acceleration must be constant
        let mut end = start.extrapolate(2.0);
        end.acc = 2.0;
        assert!(!MotionSegment::new(start, end).is_valid());

        // End must be reachable from the start
        let mut end = start.extrapolate(2.0);
        end.pos += 1.0;
        assert!(!MotionSegment::new(start, end).is_valid());

        // Velocity can't change sign
        let start = MotionState::new(0.0, 0.0, -1.0, 1.0);
        assert!(!MotionSegment::new(start, start.extrapolate(2.0)).is_valid());
        assert!(MotionSegment::new(start, start.extrapolate(1.0)).is_valid());

        // Infinite deceleration spike
        let inf = std::f64::NEG_INFINITY;
        let spike = MotionSegment::new(
            MotionState::new(1.0, 5.0, 3.0, inf),
            MotionState::new(1.0, 5.0, 0.0, inf),
        );
        assert!(spike.is_valid());
    }

    #[test]
    fn test_contains() {
        let start = MotionState::new(1.0, 4.0, -1.0, 0.0);
        let seg = MotionSegment::new(start, start.extrapolate(3.0));

        assert!(seg.contains_time(1.0));
        assert!(seg.contains_time(3.0));
        assert!(!seg.contains_time(3.1));

        assert!(seg.contains_pos(4.0));
        assert!(seg.contains_pos(2.0));
        assert!(seg.contains_pos(3.0));
        assert!(!seg.contains_pos(4.5));
    }
}
