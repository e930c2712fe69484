//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
///
/// The mapping is not clamped, values outside `source_range` extrapolate
/// linearly. A degenerate source range produces NaN or an infinity.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into the range `[min, max]`.
///
/// NaN values are passed through unchanged.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Returns the sign of the value.
///
/// Unlike `f64::signum` this returns zero for a (positive or negative) zero
/// argument, and NaN for a NaN argument.
pub fn signum<T>(value: T) -> T
where
    T: Float
{
    if value.is_nan() || value == T::zero() {
        value
    }
    else if value > T::zero() {
        T::one()
    }
    else {
        -T::one()
    }
}

/// Returns true if `a` and `b` are within `epsilon` of each other.
///
/// Comparisons involving NaN are always false.
pub fn epsilon_equals<T>(a: T, b: T, epsilon: T) -> bool
where
    T: Float
{
    (a - epsilon <= b) && (a + epsilon >= b)
}
