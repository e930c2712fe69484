//! Rigid transforms (poses) in the plane

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::{Interpolate, Rotation, Translation, Twist, EPSILON};
use util::maths::epsilon_equals;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A translation followed by a rotation, i.e. a pose of the robot in the
/// field frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidTransform {
    translation: Translation,
    rotation: Rotation,
}

/// A robot pose is just a rigid transform from the field origin.
pub type Pose = RigidTransform;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RigidTransform {
    pub fn new(translation: Translation, rotation: Rotation) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_translation(translation: Translation) -> Self {
        Self::new(translation, Rotation::identity())
    }

    pub fn from_rotation(rotation: Rotation) -> Self {
        Self::new(Translation::identity(), rotation)
    }

    pub fn translation(&self) -> Translation {
        self.translation
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_translation(&mut self, translation: Translation) {
        self.translation = translation;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Obtain the transform reached by following a constant curvature arc
    /// described by `delta`, starting from the identity.
    pub fn exp(delta: Twist) -> Self {
        let sin_theta = delta.dtheta.sin();
        let cos_theta = delta.dtheta.cos();

        // Near zero rotation use the Taylor expansion of sin(x)/x and
        // (1 - cos(x))/x
        let (s, c) = if delta.dtheta.abs() < EPSILON {
            (
                1.0 - delta.dtheta * delta.dtheta / 6.0,
                0.5 * delta.dtheta,
            )
        } else {
            (
                sin_theta / delta.dtheta,
                (1.0 - cos_theta) / delta.dtheta,
            )
        };

        Self::new(
            Translation::new(
                delta.dx * s - delta.dy * c,
                delta.dx * c + delta.dy * s,
            ),
            Rotation::new(cos_theta, sin_theta, false),
        )
    }

    /// The twist which, through `exp`, produces `transform`.
    pub fn log(transform: &RigidTransform) -> Twist {
        let dtheta = transform.rotation.radians();
        let half_dtheta = 0.5 * dtheta;
        let cos_minus_one = transform.rotation.cos() - 1.0;

        let half_theta_by_tan_half_theta = if cos_minus_one.abs() < EPSILON {
            1.0 - dtheta * dtheta / 12.0
        } else {
            -(half_dtheta * transform.rotation.sin()) / cos_minus_one
        };

        let t = transform
            .translation
            .rotate_by(Rotation::new(half_theta_by_tan_half_theta, -half_dtheta, false));

        Twist::new(t.x(), t.y(), dtheta)
    }

    /// Compose this transform with `other`, applying `other` in this
    /// transform's frame.
    pub fn transform_by(&self, other: RigidTransform) -> Self {
        Self::new(
            self.translation + other.translation.rotate_by(self.rotation),
            self.rotation.rotate_by(other.rotation),
        )
    }

    pub fn inverse(&self) -> Self {
        let inv_rot = self.rotation.inverse();

        Self::new(self.translation.inverse().rotate_by(inv_rot), inv_rot)
    }

    /// Same position, heading turned 90 degrees anticlockwise.
    pub fn normal(&self) -> Self {
        Self::new(self.translation, self.rotation.normal())
    }

    /// The point at which the lines described by the two transforms (a point
    /// and heading each) cross.
    ///
    /// Parallel lines give a point at positive infinity in both axes.
    pub fn intersection(&self, other: RigidTransform) -> Translation {
        if self.rotation.is_parallel(other.rotation) {
            return Translation::new(std::f64::INFINITY, std::f64::INFINITY);
        }

        if self.rotation.cos().abs() < other.rotation.cos().abs() {
            Self::intersection_internal(self, &other)
        } else {
            Self::intersection_internal(&other, self)
        }
    }

    /// True if the two transforms lie on the same line with the same (or
    /// opposite) heading.
    pub fn is_colinear(&self, other: RigidTransform) -> bool {
        if !self.rotation.is_parallel(other.rotation) {
            return false;
        }

        let twist = Self::log(&self.inverse().transform_by(other));

        epsilon_equals(twist.dy, 0.0, EPSILON) && epsilon_equals(twist.dtheta, 0.0, EPSILON)
    }

    /// `b` must have the larger absolute cosine so that its tangent is
    /// finite.
    fn intersection_internal(a: &RigidTransform, b: &RigidTransform) -> Translation {
        let a_r = a.rotation;
        let a_t = a.translation;
        let b_t = b.translation;

        let tan_b = b.rotation.tan();
        let t = ((a_t.x() - b_t.x()) * tan_b + b_t.y() - a_t.y())
            / (a_r.sin() - a_r.cos() * tan_b);

        a_t + a_r.to_translation() * t
    }
}

impl Interpolate for RigidTransform {
    /// Interpolate along the constant curvature arc joining the transforms.
    fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            return *self;
        } else if x >= 1.0 {
            return *other;
        }

        let twist = Self::log(&self.inverse().transform_by(*other));
        self.transform_by(Self::exp(twist.scaled(x)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-6;

    fn assert_twist_eq(a: Twist, b: Twist) {
        assert!(epsilon_equals(a.dx, b.dx, EPS), "{:?} != {:?}", a, b);
        assert!(epsilon_equals(a.dy, b.dy, EPS), "{:?} != {:?}", a, b);
        assert!(epsilon_equals(a.dtheta, b.dtheta, EPS), "{:?} != {:?}", a, b);
    }

    fn assert_pose_eq(a: Pose, b: Pose) {
        assert!(
            epsilon_equals(a.translation().x(), b.translation().x(), EPS)
                && epsilon_equals(a.translation().y(), b.translation().y(), EPS)
                && epsilon_equals(a.rotation().cos(), b.rotation().cos(), EPS)
                && epsilon_equals(a.rotation().sin(), b.rotation().sin(), EPS),
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_exp_quarter_circle() {
        // Quarter of a circle of radius 1
        let t = RigidTransform::exp(Twist::new(PI / 2.0, 0.0, PI / 2.0));
        assert!(epsilon_equals(t.translation().x(), 1.0, EPS));
        assert!(epsilon_equals(t.translation().y(), 1.0, EPS));
        assert!(epsilon_equals(t.rotation().degrees(), 90.0, EPS));

        // Straight lines
        let t = RigidTransform::exp(Twist::new(3.0, 0.0, 0.0));
        assert_pose_eq(t, Pose::from_translation(Translation::new(3.0, 0.0)));
    }

    #[test]
    fn test_exp_log_inverse() {
        let twists = [
            Twist::new(1.0, 0.0, 0.0),
            Twist::new(2.5, 0.0, 0.7),
            Twist::new(-1.0, 0.3, -1.2),
            Twist::new(0.5, 0.0, 1e-12),
        ];

        for twist in twists.iter() {
            assert_twist_eq(RigidTransform::log(&RigidTransform::exp(*twist)), *twist);
        }

        let pose = Pose::new(Translation::new(3.0, -2.0), Rotation::from_degrees(40.0));
        assert_pose_eq(RigidTransform::exp(RigidTransform::log(&pose)), pose);
    }

    #[test]
    fn test_transform_and_inverse() {
        let a = Pose::new(Translation::new(3.0, 4.0), Rotation::from_degrees(45.0));
        let b = Pose::new(Translation::new(1.0, 0.0), Rotation::from_degrees(45.0));

        let c = a.transform_by(b);
        assert!(epsilon_equals(c.translation().x(), 3.0 + 0.5f64.sqrt(), EPS));
        assert!(epsilon_equals(c.translation().y(), 4.0 + 0.5f64.sqrt(), EPS));
        assert!(epsilon_equals(c.rotation().degrees(), 90.0, EPS));

        assert_pose_eq(a.transform_by(a.inverse()), Pose::identity());
    }

    #[test]
    fn test_intersection() {
        let a = Pose::new(Translation::new(0.0, 0.0), Rotation::from_degrees(0.0));
        let b = Pose::new(Translation::new(5.0, 5.0), Rotation::from_degrees(90.0));
        let i = a.intersection(b);
        assert!(epsilon_equals(i.x(), 5.0, EPS));
        assert!(epsilon_equals(i.y(), 0.0, EPS));

        // Argument order doesn't matter
        let i = b.intersection(a);
        assert!(epsilon_equals(i.x(), 5.0, EPS));
        assert!(epsilon_equals(i.y(), 0.0, EPS));

        let c = Pose::new(Translation::new(0.0, 2.0), Rotation::from_degrees(45.0));
        let i = a.intersection(c);
        assert!(epsilon_equals(i.x(), -2.0, EPS));
        assert!(epsilon_equals(i.y(), 0.0, EPS));

        // Parallel lines never meet
        let d = Pose::new(Translation::new(0.0, 1.0), Rotation::from_degrees(180.0));
        let i = a.intersection(d);
        assert!(i.x().is_infinite() && i.y().is_infinite());
    }

    #[test]
    fn test_colinear() {
        let a = Pose::new(Translation::new(0.0, 0.0), Rotation::from_degrees(30.0));
        let on_line = Pose::new(
            Translation::new(30f64.to_radians().cos() * 4.0, 30f64.to_radians().sin() * 4.0),
            Rotation::from_degrees(30.0),
        );
        let off_line = Pose::new(Translation::new(4.0, 0.0), Rotation::from_degrees(30.0));

        assert!(a.is_colinear(on_line));
        assert!(!a.is_colinear(off_line));
        assert!(!a.is_colinear(Pose::from_rotation(Rotation::from_degrees(31.0))));
    }

    #[test]
    fn test_interpolate() {
        let a = Pose::identity();
        let b = RigidTransform::exp(Twist::new(PI, 0.0, PI));

        // Halfway around a semicircle of radius 1
        let mid = a.interpolate(&b, 0.5);
        assert!(epsilon_equals(mid.translation().x(), 1.0, EPS));
        assert!(epsilon_equals(mid.translation().y(), 1.0, EPS));
        assert!(epsilon_equals(mid.rotation().degrees(), 90.0, EPS));
    }
}
