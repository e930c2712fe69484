//! Two dimensional rotation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::{Interpolate, Translation, EPSILON};
use util::maths::epsilon_equals;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rotation in the plane, stored as a point on the unit circle.
///
/// Composition always renormalises. Construction only normalises when asked
/// to, so the log map can use a scaled (non unit) rotation internally.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    cos: f64,
    sin: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rotation {
    /// Create a new rotation from cosine and sine components.
    ///
    /// If `normalize` is set and the components have (almost) zero magnitude
    /// the identity rotation is produced.
    pub fn new(cos: f64, sin: f64, normalize: bool) -> Self {
        let mut r = Self { cos, sin };

        if normalize {
            r.normalize();
        }

        r
    }

    pub fn identity() -> Self {
        Self { cos: 1.0, sin: 0.0 }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self {
            cos: radians.cos(),
            sin: radians.sin(),
        }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    fn normalize(&mut self) {
        let magnitude = self.cos.hypot(self.sin);

        if magnitude > EPSILON {
            self.cos /= magnitude;
            self.sin /= magnitude;
        } else {
            self.cos = 1.0;
            self.sin = 0.0;
        }
    }

    pub fn cos(&self) -> f64 {
        self.cos
    }

    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// Tangent of the angle, saturating to an infinity when the cosine is
    /// zero.
    pub fn tan(&self) -> f64 {
        if self.cos.abs() < EPSILON {
            if self.sin >= 0.0 {
                std::f64::INFINITY
            } else {
                std::f64::NEG_INFINITY
            }
        } else {
            self.sin / self.cos
        }
    }

    /// Angle in the range [-pi, pi].
    pub fn radians(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    pub fn degrees(&self) -> f64 {
        self.radians().to_degrees()
    }

    /// Compose two rotations.
    pub fn rotate_by(&self, other: Rotation) -> Self {
        Self::new(
            self.cos * other.cos - self.sin * other.sin,
            self.cos * other.sin + self.sin * other.cos,
            true,
        )
    }

    /// This rotation turned a further 90 degrees anticlockwise.
    pub fn normal(&self) -> Self {
        Self {
            cos: -self.sin,
            sin: self.cos,
        }
    }

    pub fn inverse(&self) -> Self {
        Self {
            cos: self.cos,
            sin: -self.sin,
        }
    }

    /// True if both rotations point along the same line (in either sense).
    pub fn is_parallel(&self, other: Rotation) -> bool {
        epsilon_equals(
            Translation::cross(self.to_translation(), other.to_translation()),
            0.0,
            EPSILON,
        )
    }

    pub fn to_translation(&self) -> Translation {
        Translation::new(self.cos, self.sin)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Interpolate for Rotation {
    /// Interpolate along the shortest angular difference between the two
    /// rotations.
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            return *self;
        } else if x >= 1.0 {
            return *other;
        }

        let angle_diff = self.inverse().rotate_by(*other).radians();
        self.rotate_by(Rotation::from_radians(angle_diff * x))
    }
}
