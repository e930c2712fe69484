//! Two dimensional translation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

// Internal
use super::{Interpolate, Rotation};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A translation in the plane, equivalently a point or a 2D vector.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    vec: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Translation {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            vec: Vector2::new(x, y),
        }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The vector pointing from `start` to `end`.
    pub fn between(start: Translation, end: Translation) -> Self {
        Self {
            vec: end.vec - start.vec,
        }
    }

    pub fn x(&self) -> f64 {
        self.vec[0]
    }

    pub fn y(&self) -> f64 {
        self.vec[1]
    }

    /// Access the underlying vector.
    pub fn as_vector(&self) -> &Vector2<f64> {
        &self.vec
    }

    /// Euclidian length of the translation.
    pub fn norm(&self) -> f64 {
        self.x().hypot(self.y())
    }

    pub fn translate_by(&self, other: Translation) -> Self {
        *self + other
    }

    /// Rotate the translation about the origin.
    pub fn rotate_by(&self, rotation: Rotation) -> Self {
        Self::new(
            self.x() * rotation.cos() - self.y() * rotation.sin(),
            self.x() * rotation.sin() + self.y() * rotation.cos(),
        )
    }

    /// The direction of this vector as a (normalised) rotation.
    pub fn direction(&self) -> Rotation {
        Rotation::new(self.x(), self.y(), true)
    }

    pub fn inverse(&self) -> Self {
        -*self
    }

    /// Linear extrapolation along the line through `self` and `other`, with
    /// `x = 0` giving `self` and `x = 1` giving `other`. Not clamped.
    pub fn extrapolate(&self, other: Translation, x: f64) -> Self {
        Self {
            vec: self.vec + (other.vec - self.vec) * x,
        }
    }

    pub fn scale(&self, s: f64) -> Self {
        *self * s
    }

    pub fn dot(a: Translation, b: Translation) -> f64 {
        a.vec.dot(&b.vec)
    }

    /// The z component of the 3D cross product of the two vectors.
    pub fn cross(a: Translation, b: Translation) -> f64 {
        a.vec.perp(&b.vec)
    }

    /// The unsigned angle between two vectors, in the range [0, pi].
    ///
    /// If either vector has zero length the identity rotation is returned.
    pub fn angle_between(a: Translation, b: Translation) -> Rotation {
        let cos_angle = Self::dot(a, b) / (a.norm() * b.norm());

        if cos_angle.is_nan() {
            return Rotation::identity();
        }

        Rotation::from_radians(cos_angle.max(-1.0).min(1.0).acos())
    }
}

impl Interpolate for Translation {
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            self.extrapolate(*other, x)
        }
    }
}

impl Default for Translation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Add for Translation {
    type Output = Translation;

    fn add(self, rhs: Translation) -> Translation {
        Translation {
            vec: self.vec + rhs.vec,
        }
    }
}

impl Sub for Translation {
    type Output = Translation;

    fn sub(self, rhs: Translation) -> Translation {
        Translation {
            vec: self.vec - rhs.vec,
        }
    }
}

impl Neg for Translation {
    type Output = Translation;

    fn neg(self) -> Translation {
        Translation { vec: -self.vec }
    }
}

impl Mul<f64> for Translation {
    type Output = Translation;

    fn mul(self, rhs: f64) -> Translation {
        Translation {
            vec: self.vec * rhs,
        }
    }
}

impl From<Vector2<f64>> for Translation {
    fn from(vec: Vector2<f64>) -> Self {
        Self { vec }
    }
}
