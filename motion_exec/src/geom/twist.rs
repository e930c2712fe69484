//! Body frame velocity / finite delta

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A movement along an arc at constant curvature and velocity, expressed in
/// the body frame.
///
/// Depending on context this is either a rate (per second) or a finite
/// delta.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist {
    /// Forward component
    pub dx: f64,

    /// Lateral component, normally zero for a differential drive
    pub dy: f64,

    /// Angular component, radians
    pub dtheta: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Twist {
    pub fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn scaled(&self, s: f64) -> Self {
        Self::new(self.dx * s, self.dy * s, self.dtheta * s)
    }

    /// Curvature (1/radius) of the arc described by this twist.
    ///
    /// `None` if the twist has no forward component, in which case the
    /// curvature is undefined.
    pub fn curvature(&self) -> Option<f64> {
        let k = self.dtheta / self.dx;

        if k.is_nan() || k.is_infinite() {
            None
        } else {
            Some(k)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_curvature() {
        assert_eq!(Twist::new(2.0, 0.0, 1.0).curvature(), Some(0.5));
        assert_eq!(Twist::new(2.0, 0.0, 0.0).curvature(), Some(0.0));
        assert_eq!(Twist::identity().curvature(), None);
        assert_eq!(Twist::new(0.0, 0.0, 1.0).curvature(), None);
        assert_eq!(Twist::new(1.0, 2.0, 3.0).scaled(2.0), Twist::new(2.0, 4.0, 6.0));
    }
}
