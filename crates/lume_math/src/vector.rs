//! Vector helpers on top of glam.
//!
//! glam already provides add, subtract, scalar and component-wise multiply,
//! dot and cross. What it doesn't give us is a normalize that refuses a
//! zero-length input instead of quietly producing NaN.

use crate::Vec3;

/// Extra operations used by the tracer.
pub trait VectorExt {
    /// Component-wise product, used to tint light by a surface color.
    fn hadamard(self, other: Self) -> Self;

    /// Normalize to unit length.
    ///
    /// # Panics
    ///
    /// Panics if the vector has zero (or non-finite) length. Normalizing a
    /// zero vector is a caller bug, never a recoverable condition.
    fn unit(self) -> Self;

    /// Returns true if the length is within `eps` of 1.
    fn is_unit(self, eps: f64) -> bool;
}

impl VectorExt for Vec3 {
    #[inline]
    fn hadamard(self, other: Self) -> Self {
        self * other
    }

    #[inline]
    fn unit(self) -> Self {
        let length = self.length();
        assert!(
            length > 0.0 && length.is_finite(),
            "cannot normalize degenerate vector {:?}",
            self
        );
        self / length
    }

    #[inline]
    fn is_unit(self, eps: f64) -> bool {
        (self.length() - 1.0).abs() <= eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadamard() {
        let light = Vec3::new(1.0, 0.5, 2.0);
        let albedo = Vec3::new(0.5, 1.0, 0.25);
        assert_eq!(light.hadamard(albedo), Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_unit() {
        let v = Vec3::new(3.0, 0.0, 4.0).unit();
        assert!(v.is_unit(1e-12));
        assert!((v - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "degenerate")]
    fn test_unit_zero_panics() {
        let _ = Vec3::ZERO.unit();
    }

    #[test]
    #[should_panic(expected = "degenerate")]
    fn test_unit_nan_panics() {
        let _ = Vec3::new(f64::NAN, 0.0, 1.0).unit();
    }
}
