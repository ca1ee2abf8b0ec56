use nalgebra::{Vector2, Vector3};

use crate::constants::{AXIS_RANGE_SLACK, MOVE_EPS};

/// Project a world position onto the ground plane as `(x, z)`.
#[inline]
pub fn to_planar(v: &Vector3<f32>) -> Vector2<f32> {
    Vector2::new(v.x, v.z)
}

/// Planar (XZ) distance squared between two world positions.
#[inline]
pub fn planar_distance_sq(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    let x = b.x - a.x;
    let z = b.y - a.y;
    x * x + z * z
}

/// Facing angle of a planar movement vector, `atan2(z, x)`.
///
/// Returns `None` when the vector is too short to define a direction.
#[inline]
pub fn yaw_from_xz(xz: Vector2<f32>) -> Option<f32> {
    if xz.norm_squared() > MOVE_EPS * MOVE_EPS {
        return Some(xz.y.atan2(xz.x));
    }

    None
}

/// Validate an input axis.
///
/// Values within float slack of `[-1, 1]` are clamped into range. NaN, infinities and
/// anything further out are malformed and yield `None`.
#[inline]
pub fn sanitize_axis(v: f32) -> Option<f32> {
    (v.is_finite() && v.abs() <= 1.0 + AXIS_RANGE_SLACK).then(|| v.clamp(-1.0, 1.0))
}
