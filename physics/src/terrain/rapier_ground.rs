//! Rapier-backed walkable surface for ground height probes.
//!
//! Builds an in-memory Rapier scene holding only the walkable ground colliders and
//! answers [`HeightQuery`] with a single downward ray cast.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-only: nothing is simulated; the broad phase is updated once at build time.
//! - Ground-only: obstacles never enter this scene, so rocks and crates do not count as ground.

use rapier3d::na::{DMatrix, Point3, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use super::oracle::HeightQuery;
use crate::constants::{GROUND_SURFACE_NAME, PROBE_MAX_DISTANCE, PROBE_ORIGIN_Y};

/// Definition of one walkable surface collider.
///
/// Conventions
/// - Units are world units.
/// - Rotation is a unit quaternion; planes use `normal = rotation * +Y`.
#[derive(Clone, Debug)]
pub struct GroundSurfaceDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector3<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    pub shape: GroundShapeDef,
}

impl GroundSurfaceDef {
    pub fn new(id: u32, translation: Vector3<f32>, shape: GroundShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
        }
    }
}

/// Supported walkable surface shapes.
#[derive(Clone, Debug)]
pub enum GroundShapeDef {
    /// Infinite plane, offset along its normal from the pose translation.
    Plane { offset_along_normal: f32 },

    /// Oriented box with given half-extents; its top face is the walkable part.
    Cuboid { half_extents: Vector3<f32> },

    /// Regular heightfield centered on the pose translation.
    ///
    /// `heights` is row-major over Z (rows) and X (columns); `scale` is the total
    /// extent along X and Z, and the height multiplier along Y.
    HeightField {
        heights: DMatrix<f32>,
        scale: Vector3<f32>,
    },
}

/// Does a renderable with this name represent the walkable ground?
pub fn is_walkable_surface_name(name: &str) -> bool {
    name.to_ascii_lowercase().contains(GROUND_SURFACE_NAME)
}

/// In-memory Rapier structures needed for ray queries against the ground.
pub struct RapierGround {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl RapierGround {
    /// Build from a list of surface definitions.
    ///
    /// The input is sorted by `id` before insertion.
    pub fn build(mut defs: Vec<GroundSurfaceDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            colliders.insert_with_parent(collider_from_def(def), rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): refreshes the broad-phase BVH so
        // queries see every collider.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        log::info!("built ground query world with {} surface(s)", colliders.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Build from named renderables, keeping only those named as walkable ground.
    pub fn from_named<'a>(surfaces: impl IntoIterator<Item = (&'a str, GroundSurfaceDef)>) -> Self {
        let defs = surfaces
            .into_iter()
            .filter_map(|(name, def)| {
                if is_walkable_surface_name(name) {
                    Some(def)
                } else {
                    log::debug!("ignoring non-walkable surface `{name}`");
                    None
                }
            })
            .collect();
        Self::build(defs)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.len() == 0
    }

    fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

impl HeightQuery for RapierGround {
    fn probe_height(&self, x: f32, z: f32) -> Option<f32> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let ray = Ray::new(Point3::new(x, PROBE_ORIGIN_Y, z), Vector3::new(0.0, -1.0, 0.0));
        let pipeline = self.query_pipeline(QueryFilter::default());
        pipeline
            .cast_ray(&ray, PROBE_MAX_DISTANCE, true)
            .map(|(_handle, toi)| ray.point_at(toi).y)
    }
}

/// Build a Rapier collider from a `GroundSurfaceDef`.
///
/// The pose lives on the parent rigid body, so the collider is local to it.
fn collider_from_def(def: &GroundSurfaceDef) -> Collider {
    match &def.shape {
        GroundShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local +Y becomes `rotation * +Y` through the parent pose.
            let up = UnitVector::new_normalize(Vector3::y());
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(up)))
                .translation(Vector3::new(0.0, *offset_along_normal, 0.0))
                .build()
        }

        GroundShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        GroundShapeDef::HeightField { heights, scale } => {
            ColliderBuilder::heightfield(heights.clone(), *scale).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_plane(y: f32) -> GroundSurfaceDef {
        GroundSurfaceDef::new(
            1,
            Vector3::new(0.0, y, 0.0),
            GroundShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        )
    }

    fn slab(id: u32, center: Vector3<f32>, half_extents: Vector3<f32>) -> GroundSurfaceDef {
        GroundSurfaceDef::new(id, center, GroundShapeDef::Cuboid { half_extents })
    }

    #[test]
    fn plane_height_is_found_everywhere() {
        let ground = RapierGround::build(vec![flat_plane(1.5)]);
        for (x, z) in [(0.0, 0.0), (120.0, -40.0), (-999.0, 999.0)] {
            let h = ground.probe_height(x, z).unwrap();
            assert!((h - 1.5).abs() < 1.0e-3, "({x}, {z}) -> {h}");
        }
    }

    #[test]
    fn slab_top_is_the_height_and_outside_is_none() {
        let ground = RapierGround::build(vec![slab(
            1,
            Vector3::new(0.0, -0.5, 0.0),
            Vector3::new(50.0, 0.5, 50.0),
        )]);

        let h = ground.probe_height(10.0, -10.0).unwrap();
        assert!(h.abs() < 1.0e-3);
        assert_eq!(ground.probe_height(80.0, 0.0), None);
    }

    #[test]
    fn highest_surface_wins() {
        let ground = RapierGround::build(vec![
            slab(1, Vector3::new(0.0, -0.5, 0.0), Vector3::new(50.0, 0.5, 50.0)),
            slab(2, Vector3::new(5.0, 1.0, 5.0), Vector3::new(1.0, 1.0, 1.0)),
        ]);

        let h = ground.probe_height(5.0, 5.0).unwrap();
        assert!((h - 2.0).abs() < 1.0e-3);
    }

    #[test]
    fn only_named_ground_is_kept() {
        let ground = RapierGround::from_named([
            ("Ground_Main", flat_plane(0.0)),
            ("rock_large", slab(2, Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 1.0, 1.0))),
        ]);
        assert_eq!(ground.len(), 1);

        let h = ground.probe_height(0.0, 0.0).unwrap();
        assert!(h.abs() < 1.0e-3);
    }

    #[test]
    fn walkable_name_convention() {
        assert!(is_walkable_surface_name("ground"));
        assert!(is_walkable_surface_name("Terrain_Ground_01"));
        assert!(!is_walkable_surface_name("tree_03"));
    }
}
