//! # Math Helpers
//!
//! Scalar interpolation and vector angle helpers. All of them are total:
//! degenerate inputs return zero instead of NaN.

use bevy::math::Vec3;

use crate::constants::VECTOR_EPSILON;

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}

/// Linear interpolation without clamping `t`
#[inline]
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `value` between `a` and `b`, clamped to [0, 1].
///
/// Returns 0 when `a == b`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    clamp01((value - a) / (b - a))
}

#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Unsigned angle between two vectors in degrees, 0 if either is zero
pub fn angle_deg(from: Vec3, to: Vec3) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < VECTOR_EPSILON * VECTOR_EPSILON {
        return 0.0;
    }
    let cos = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Angle in degrees from `from` to `to`, signed by the rotation sense about `axis`.
///
/// The sign is positive when `from × to` points along `axis`.
pub fn signed_angle_deg(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = angle_deg(from, to);
    let sign = if axis.dot(from.cross(to)) < 0.0 { -1.0 } else { 1.0 };
    unsigned * sign
}

/// Removes the component of `vector` along `normal`
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let sq = normal.length_squared();
    if sq < VECTOR_EPSILON * VECTOR_EPSILON {
        return vector;
    }
    vector - normal * (vector.dot(normal) / sq)
}

/// Area of the triangle `abc`
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    0.5 * (b - a).cross(c - a).length()
}

/// Signed volume of the tetrahedron `abcd`
#[inline]
pub fn signed_tetrahedron_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> f32 {
    (a - d).dot((b - d).cross(c - d)) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_angle_sense() {
        let right = signed_angle_deg(Vec3::Z, Vec3::X, Vec3::Y);
        assert!((right - 90.0).abs() < 1e-4);

        let left = signed_angle_deg(Vec3::Z, -Vec3::X, Vec3::Y);
        assert!((left + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_of_zero_vector_is_zero() {
        assert_eq!(signed_angle_deg(Vec3::ZERO, Vec3::X, Vec3::Y), 0.0);
    }

    #[test]
    fn test_inverse_lerp_degenerate_range() {
        assert_eq!(inverse_lerp(2.0, 2.0, 5.0), 0.0);
        assert!((inverse_lerp(180.0, 160.0, 170.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unit_tetrahedron_volume() {
        let v = signed_tetrahedron_volume(Vec3::X, Vec3::Y, Vec3::Z, Vec3::ZERO);
        assert!((v.abs() - 1.0 / 6.0).abs() < 1e-6);
    }
}
