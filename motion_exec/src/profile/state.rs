//! Instantaneous 1D motion state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::EPSILON;
use util::maths::{epsilon_equals, signum};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A fully specified instant of 1D motion: time, position, velocity and
/// acceleration.
///
/// The all-NaN state (see [`MotionState::invalid`]) is used as a sentinel for
/// "no state". Such a state is equal to any other all-NaN state.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct MotionState {
    pub t: f64,
    pub pos: f64,
    pub vel: f64,
    pub acc: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionState {
    pub fn new(t: f64, pos: f64, vel: f64, acc: f64) -> Self {
        Self { t, pos, vel, acc }
    }

    /// The sentinel "no state" value.
    pub fn invalid() -> Self {
        Self::new(std::f64::NAN, std::f64::NAN, std::f64::NAN, std::f64::NAN)
    }

    /// A state is valid if any of its fields is a number.
    pub fn is_valid(&self) -> bool {
        !(self.t.is_nan() && self.pos.is_nan() && self.vel.is_nan() && self.acc.is_nan())
    }

    /// Square of the velocity.
    pub fn vel2(&self) -> f64 {
        self.vel * self.vel
    }

    /// Extrapolate this state to time `t`, keeping the acceleration constant.
    pub fn extrapolate(&self, t: f64) -> Self {
        self.extrapolate_with_acc(t, self.acc)
    }

    /// Extrapolate this state to time `t` with the given acceleration.
    pub fn extrapolate_with_acc(&self, t: f64, acc: f64) -> Self {
        let dt = t - self.t;

        // Avoids 0 * inf for the instantaneous velocity change segments
        if dt == 0.0 {
            return Self::new(t, self.pos, self.vel, acc);
        }

        Self::new(
            t,
            self.pos + self.vel * dt + 0.5 * acc * dt * dt,
            self.vel + acc * dt,
            acc,
        )
    }

    /// Find the next time (at or after this state's time) at which the given
    /// position is reached, assuming constant acceleration.
    ///
    /// Returns `None` if the position is never reached.
    pub fn next_time_at_pos(&self, pos: f64) -> Option<f64> {
        if epsilon_equals(pos, self.pos, EPSILON) {
            return Some(self.t);
        }

        if epsilon_equals(self.acc, 0.0, EPSILON) {
            let delta_pos = pos - self.pos;
            let vel_sign = signum(self.vel);

            if self.vel != 0.0 && signum(delta_pos) == vel_sign {
                return Some(delta_pos / self.vel + self.t);
            }

            return None;
        }

        // Solve pos = self.pos + vel*dt + 0.5*acc*dt^2 for dt
        let disc = self.vel2() - 2.0 * self.acc * (self.pos - pos);
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let max_dt = (-self.vel + sqrt_disc) / self.acc;
        let min_dt = (-self.vel - sqrt_disc) / self.acc;

        if min_dt >= 0.0 && (max_dt < 0.0 || min_dt < max_dt) {
            Some(self.t + min_dt)
        } else if max_dt >= 0.0 {
            Some(self.t + max_dt)
        } else {
            None
        }
    }

    /// Mirror the state about the position origin. Time is unaffected.
    pub fn flipped(&self) -> Self {
        Self::new(self.t, -self.pos, -self.vel, -self.acc)
    }

    /// True if time, position and velocity match within the default
    /// tolerance. Acceleration is ignored.
    pub fn coincident(&self, other: &MotionState) -> bool {
        self.coincident_eps(other, EPSILON)
    }

    pub fn coincident_eps(&self, other: &MotionState, epsilon: f64) -> bool {
        epsilon_equals(self.t, other.t, epsilon)
            && epsilon_equals(self.pos, other.pos, epsilon)
            && epsilon_equals(self.vel, other.vel, epsilon)
    }

    /// True if the states are coincident and have the same acceleration, or
    /// if both are the invalid state.
    pub fn equals(&self, other: &MotionState) -> bool {
        self.equals_eps(other, EPSILON)
    }

    pub fn equals_eps(&self, other: &MotionState, epsilon: f64) -> bool {
        if !self.is_valid() && !other.is_valid() {
            return true;
        }

        self.coincident_eps(other, epsilon) && epsilon_equals(self.acc, other.acc, epsilon)
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl PartialEq for MotionState {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extrapolate() {
        let s = MotionState::new(1.0, 2.0, 3.0, 4.0);

        let e = s.extrapolate(3.0);
        assert!(epsilon_equals(e.pos, 2.0 + 3.0 * 2.0 + 0.5 * 4.0 * 4.0, EPSILON));
        assert!(epsilon_equals(e.vel, 3.0 + 4.0 * 2.0, EPSILON));
        assert_eq!(e.t, 3.0);

        let e = s.extrapolate_with_acc(2.0, -2.0);
        assert!(epsilon_equals(e.pos, 2.0 + 3.0 - 1.0, EPSILON));
        assert!(epsilon_equals(e.vel, 1.0, EPSILON));
        assert_eq!(e.acc, -2.0);

        // Infinite acceleration over zero time stays put
        let spike = MotionState::new(1.0, 2.0, 3.0, std::f64::NEG_INFINITY);
        assert_eq!(spike.extrapolate(1.0).pos, 2.0);
    }

    #[test]
    fn test_extrapolate_round_trip() {
        let states = [
            MotionState::new(0.0, 0.0, 0.0, 0.0),
            MotionState::new(1.5, -3.0, 2.0, -1.0),
            MotionState::new(-2.0, 10.0, -4.0, 6.0),
        ];

        for s in states.iter() {
            for dt in [-1.0, 0.25, 3.0].iter() {
                let back = s.extrapolate(s.t + dt).extrapolate(s.t);
                assert!(back.equals(s), "{:?} -> {:?}", s, back);
            }
        }
    }

    #[test]
    fn test_next_time_at_pos() {
        // Constant velocity
        let s = MotionState::new(1.0, 0.0, 2.0, 0.0);
        assert_eq!(s.next_time_at_pos(0.0), Some(1.0));
        assert!(epsilon_equals(s.next_time_at_pos(4.0).unwrap(), 3.0, EPSILON));
        assert_eq!(s.next_time_at_pos(-4.0), None);

        // Stationary
        let s = MotionState::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(s.next_time_at_pos(1.0), None);

        // Accelerating from rest
        let s = MotionState::new(0.0, 0.0, 0.0, 2.0);
        assert!(epsilon_equals(s.next_time_at_pos(4.0).unwrap(), 2.0, EPSILON));
        assert_eq!(s.next_time_at_pos(-1.0), None);

        // Decelerating, turning around before the target
        let s = MotionState::new(0.0, 0.0, 2.0, -2.0);
        assert_eq!(s.next_time_at_pos(2.0), None);
        assert!(epsilon_equals(s.next_time_at_pos(0.75).unwrap(), 0.5, EPSILON));

        // Moving away but accelerating back
        let s = MotionState::new(0.0, 0.0, -1.0, 2.0);
        assert!(epsilon_equals(s.next_time_at_pos(2.0).unwrap(), 2.0, EPSILON));
    }

    #[test]
    fn test_equality() {
        let a = MotionState::new(0.0, 1.0, 2.0, 3.0);
        let b = MotionState::new(0.0, 1.0 + 1e-8, 2.0, 3.0);
        let c = MotionState::new(0.0, 1.0, 2.0, 4.0);

        assert!(a.equals(&b));
        assert!(!a.equals(&c));
        assert!(a.coincident(&c));
        assert!(MotionState::invalid().equals(&MotionState::invalid()));
        assert!(!a.equals(&MotionState::invalid()));
        assert!(!MotionState::invalid().is_valid());

        let f = a.flipped();
        assert_eq!(f, MotionState::new(0.0, -1.0, -2.0, -3.0));
    }
}
