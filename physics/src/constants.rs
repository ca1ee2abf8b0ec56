use std::time::Duration;

/// Horizontal speed in world units per reference frame (`dt = 1.0`).
pub const DEFAULT_MOVE_SPEED: f32 = 0.1;

/// Multiplier applied to `DEFAULT_MOVE_SPEED` while sprinting.
pub const DEFAULT_SPRINT_MULTIPLIER: f32 = 2.0;

/// Vertical velocity set by a jump, in world units per reference frame.
pub const DEFAULT_JUMP_IMPULSE: f32 = 0.3;

/// Vertical acceleration added every tick (negative is down).
pub const DEFAULT_GRAVITY: f32 = -0.02;

/// Minimum planar displacement (per tick) for a body to count as moving.
pub const MOVE_EPS: f32 = 0.001;

/// Float slack allowed past `[-1, 1]` before an input axis counts as malformed.
pub const AXIS_RANGE_SLACK: f32 = 0.001;

/// Bounds for the volume of an auto-derived box collider (cubic world units).
///
/// Anything outside is almost certainly a container node, not an obstacle.
pub const MIN_BOX_VOLUME: f32 = 0.001;
pub const MAX_BOX_VOLUME: f32 = 10_000.0;

/// Height band below a cylinder's top in which a body counts as standing on it.
pub const STAND_ON_TOP_TOLERANCE: f32 = 0.2;

/// Vertical window around a cylinder's top in which a falling body may land on it.
pub const LANDING_TOLERANCE: f32 = 0.5;

/// Cached ground heights older than this are not trusted.
pub const HEIGHT_CACHE_VALIDITY: Duration = Duration::from_millis(500);

/// Quantization step of the ground height cache (world units).
///
/// Deliberately coarser than `NAV_CELL_SIZE`: fewer distinct keys, more cache hits.
pub const HEIGHT_CACHE_CELL_SIZE: f32 = 2.0;

/// Origin height of the downward ground probe.
pub const PROBE_ORIGIN_Y: f32 = 1_000.0;

/// Maximum length of the downward ground probe.
pub const PROBE_MAX_DISTANCE: f32 = 2_000.0;

/// Name fragment identifying the walkable ground renderable.
pub const GROUND_SURFACE_NAME: &str = "ground";

/// Default size of one pathfinding cell in world units.
/// Coarse enough that a worst-case A* search stays inside one tick.
pub const NAV_CELL_SIZE: f32 = 1.0;

/// Largest accepted nav grid side, in cells. Larger requests are clamped.
pub const MAX_NAV_GRID_SIZE: usize = 4_096;

/// Attempts made by random walkable sampling before giving up.
pub const RANDOM_SAMPLE_ATTEMPTS: u32 = 50;
