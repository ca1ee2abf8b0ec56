/*!
Static collision root module.

Keeps bodies out of immovable obstacles (auto-derived boxes and authored cylinders).
The code is split for clarity:

- types:        shared data types (ColliderEntry, CylinderSpec, ColliderRejected, etc.)
- settings:     resolver tolerances and registration bounds
- shapes:       authored asset → cylinder/disabled overrides
- broad:        bounding-circle rejection
- narrow_phase: expanded-box and cylinder containment tests
- resolver:     the collider registry with full-stop, sliding and land-on-top queries
*/

pub mod broad;
pub mod narrow_phase;
pub mod resolver;
pub mod settings;
pub mod shapes;
pub mod types;

// Re-export commonly used types.
pub use resolver::StaticColliders;
pub use settings::ResolverSettings;
pub use shapes::{AuthoredShape, CollisionShapeTable, ShapeOverride};
pub use types::{Aabb, ColliderEntry, ColliderOwner, ColliderRejected, ColliderShape, CylinderSpec};

/// Convenience: build an `Aabb` from world-space min/max corners.
#[inline]
pub fn aabb_from_corners(min: types::Vec3, max: types::Vec3) -> Aabb {
    Aabb::new(min.into(), max.into())
}
