//! 2D vector helpers for the backdrop simulation
//!
//! Vectors are `glam::Vec2`; this module only adds the pointer-offset
//! normalisation that has to survive a zero-length offset.

pub use glam::Vec2;

/// Smallest distance used when normalising a pointer offset.
/// A pointer sitting exactly on a point would otherwise divide by zero.
pub const MIN_DISTANCE: f32 = 1e-4;

/// Returns `(unit direction, clamped length)` of `v`.
///
/// The length is clamped to [`MIN_DISTANCE`], so a zero vector yields a
/// zero direction rather than NaN.
#[inline]
pub fn direction_and_length(v: Vec2) -> (Vec2, f32) {
    let len = v.length().max(MIN_DISTANCE);
    (v / len, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector_direction_is_finite() {
        let (dir, len) = direction_and_length(Vec2::ZERO);
        assert!(dir.is_finite());
        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(len, MIN_DISTANCE);
    }

    #[test]
    fn test_direction_is_unit() {
        let (dir, len) = direction_and_length(Vec2::new(-3.0, 4.0));
        assert_eq!(len, 5.0);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x < 0.0 && dir.y > 0.0);
    }
}
