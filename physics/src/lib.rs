pub mod body;
pub mod collision;
pub mod constants;
pub mod nav;
pub mod terrain;
pub mod utils;

pub use body::{Body, BodyStep, BodyTuning, MoveInput};
pub use collision::{
    Aabb, CollisionShapeTable, ColliderOwner, ColliderRejected, CylinderSpec, ResolverSettings,
    ShapeOverride, StaticColliders, aabb_from_corners,
};
pub use nav::{PathScratch, Pathfinder};
pub use terrain::{
    GroundShapeDef, GroundSurfaceDef, HeightCacheSettings, HeightQuery, RapierGround,
    TerrainHeightOracle,
};
pub use utils::{planar_distance_sq, sanitize_axis, to_planar, yaw_from_xz};
