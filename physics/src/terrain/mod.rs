/*!
Ground height oracle.

- oracle:        `HeightQuery` capability and the cached `TerrainHeightOracle`
- cache:         coarse, time-boxed height cache (caller-supplied clock)
- rapier_ground: production `HeightQuery` backed by a Rapier scene of walkable surfaces
*/

pub mod cache;
pub mod oracle;
pub mod rapier_ground;

pub use cache::{HeightCache, HeightCacheSettings};
pub use oracle::{HeightQuery, TerrainHeightOracle};
pub use rapier_ground::{GroundShapeDef, GroundSurfaceDef, RapierGround, is_walkable_surface_name};
