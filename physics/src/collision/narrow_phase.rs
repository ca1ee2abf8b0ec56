use super::types::{Aabb, ColliderEntry, ColliderShape, CylinderSpec, Vec3};

/// Is `p` inside `aabb` once the box is grown by `body_radius` on every side?
#[inline]
pub fn point_in_expanded_box(aabb: &Aabb, p: Vec3, body_radius: f32) -> bool {
    (0..3).all(|i| p[i] >= aabb.mins[i] - body_radius && p[i] <= aabb.maxs[i] + body_radius)
}

/// Does a vertical cylinder block a body at `p`?
///
/// - Outside `[min_y, max_y]` the cylinder never blocks.
/// - Within `stand_tolerance` below `max_y` the body is on top and walks freely.
/// - Otherwise it blocks when the planar distance is under `body_radius + radius`.
#[inline]
pub fn cylinder_blocks(
    cylinder: &CylinderSpec,
    p: Vec3,
    body_radius: f32,
    stand_tolerance: f32,
) -> bool {
    if p.y < cylinder.min_y || p.y > cylinder.max_y {
        return false;
    }
    if p.y >= cylinder.max_y - stand_tolerance {
        return false;
    }

    let dx = p.x - cylinder.center.x;
    let dz = p.z - cylinder.center.y;
    let reach = body_radius + cylinder.radius;
    dx * dx + dz * dz < reach * reach
}

/// Narrow-phase dispatch for a single collider.
#[inline]
pub fn entry_blocks(entry: &ColliderEntry, p: Vec3, body_radius: f32, stand_tolerance: f32) -> bool {
    match &entry.shape {
        ColliderShape::Box(aabb) => point_in_expanded_box(aabb, p, body_radius),
        ColliderShape::Cylinder(cylinder) => {
            cylinder_blocks(cylinder, p, body_radius, stand_tolerance)
        }
    }
}
