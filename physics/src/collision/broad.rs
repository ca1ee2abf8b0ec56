use super::types::{ColliderEntry, Vec2};

/// Cheap rejection: can a body at `pos` (planar) touch this collider at all?
///
/// Compares the planar distance to the collider's bounding circle against
/// `body_radius + entry.radius`. Height is ignored here.
#[inline]
pub fn within_reach(entry: &ColliderEntry, pos: Vec2, body_radius: f32) -> bool {
    let reach = body_radius + entry.radius;
    (pos - entry.center).norm_squared() <= reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::types::CylinderSpec;

    #[test]
    fn rejects_far_colliders() {
        let entry = ColliderEntry::from_cylinder(CylinderSpec::new(Vec2::zeros(), 1.0, 0.0, 2.0));
        assert!(within_reach(&entry, Vec2::new(1.4, 0.0), 0.5));
        assert!(!within_reach(&entry, Vec2::new(1.6, 0.0), 0.5));
    }
}
