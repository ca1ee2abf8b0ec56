use std::f32::consts::TAU;

use rand::Rng;

use super::{
    astar::{self, PathScratch},
    grid::{GridCoord, OccupancyGrid},
};
use crate::{
    collision::{ColliderShape, StaticColliders, types::Vec2},
    constants::{NAV_CELL_SIZE, RANDOM_SAMPLE_ATTEMPTS},
    utils::planar_distance_sq,
};

/// Grid navigator: an occupancy grid plus A* and random-point queries.
///
/// The grid is square and centered on the world origin. Blocking is done at load time
/// (or on discrete world changes); the queries only read.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    grid: OccupancyGrid,
}

impl Pathfinder {
    pub fn new(grid_size: usize, cell_size: f32, world_size: f32) -> Self {
        let grid = OccupancyGrid::new(grid_size, cell_size, world_size);
        log::info!(
            "nav grid {0}x{0}, cell {1}, world offset {2}",
            grid.grid_size(),
            grid.cell_size(),
            grid.world_offset()
        );
        Self { grid }
    }

    /// Size the grid to cover a square world: `grid_size = ceil(world_size / cell_size)`,
    /// capped at `MAX_NAV_GRID_SIZE`.
    pub fn for_world(world_size: f32, cell_size: f32) -> Self {
        let cell = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            NAV_CELL_SIZE
        };
        let cells = if world_size.is_finite() && world_size > 0.0 {
            (world_size / cell).ceil() as usize
        } else {
            0
        };
        Self::new(cells, cell_size, world_size)
    }

    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    /// Block the single cell under `(x, z)`.
    pub fn set_blocked(&mut self, x: f32, z: f32) {
        if let Some(c) = self.grid.world_to_grid(x, z) {
            self.grid.set(c, true);
        }
    }

    /// Unblock the single cell under `(x, z)`.
    pub fn set_walkable(&mut self, x: f32, z: f32) {
        if let Some(c) = self.grid.world_to_grid(x, z) {
            self.grid.set(c, false);
        }
    }

    /// Block every cell whose center lies within `radius` of `(x, z)`.
    pub fn set_blocked_circle(&mut self, x: f32, z: f32, radius: f32) {
        if !radius.is_finite() || radius < 0.0 {
            return;
        }
        let (Some(min), Some(max)) = (
            self.grid.world_to_grid(x - radius, z - radius),
            self.grid.world_to_grid(x + radius, z + radius),
        ) else {
            return;
        };

        let r2 = radius * radius;
        let center = Vec2::new(x, z);
        self.grid
            .set_where(min, max, true, |cell| planar_distance_sq(cell, center) <= r2);
    }

    /// Block every cell overlapped by the world rectangle `[min, max]` (x, z).
    pub fn set_blocked_rect(&mut self, min_x: f32, min_z: f32, max_x: f32, max_z: f32) {
        let (Some(a), Some(b)) = (
            self.grid.world_to_grid(min_x.min(max_x), min_z.min(max_z)),
            self.grid.world_to_grid(min_x.max(max_x), min_z.max(max_z)),
        ) else {
            return;
        };
        self.grid.set_where(a, b, true, |_| true);
    }

    /// Mark every cell walkable.
    pub fn clear_blocked(&mut self) {
        self.grid.clear();
    }

    /// Stamp every registered collider into the grid, grown by `padding`.
    ///
    /// Cylinders block a circle, boxes block their planar footprint.
    pub fn block_colliders(&mut self, colliders: &StaticColliders, padding: f32) {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        for (_owner, entry) in colliders.iter() {
            match &entry.shape {
                ColliderShape::Cylinder(cyl) => {
                    self.set_blocked_circle(cyl.center.x, cyl.center.y, cyl.radius + padding);
                }
                ColliderShape::Box(aabb) => {
                    self.set_blocked_rect(
                        aabb.mins.x - padding,
                        aabb.mins.z - padding,
                        aabb.maxs.x + padding,
                        aabb.maxs.z + padding,
                    );
                }
            }
        }
        log::info!(
            "nav grid: {} collider(s) stamped, {} cell(s) blocked",
            colliders.len(),
            self.grid.blocked_count()
        );
    }

    /// Block a fence of cells whose centers are within `thickness` of the world edge.
    pub fn fence_boundary(&mut self, thickness: f32) {
        if !thickness.is_finite() || thickness <= 0.0 || self.grid.is_empty() {
            return;
        }
        let edge = self.grid.world_offset() - thickness;
        let last = self.grid.grid_size() as i32 - 1;
        self.grid.set_where(
            GridCoord::new(0, 0),
            GridCoord::new(last, last),
            true,
            |cell| cell.x.abs() >= edge || cell.y.abs() >= edge,
        );
    }

    /// Is the cell under `(x, z)` on the grid and not blocked?
    pub fn is_walkable(&self, x: f32, z: f32) -> bool {
        self.grid
            .world_to_grid(x, z)
            .is_some_and(|c| !self.grid.is_blocked(c))
    }

    /// Shortest 8-connected path from start to goal as world-space cell centers.
    ///
    /// The start cell is excluded and the goal cell included. Empty when there is no
    /// path, when an endpoint is off the grid, or when the goal is blocked.
    pub fn find_path(&self, start_x: f32, start_z: f32, goal_x: f32, goal_z: f32) -> Vec<Vec2> {
        let mut scratch = PathScratch::new();
        let mut out = Vec::new();
        self.find_path_into(&mut scratch, start_x, start_z, goal_x, goal_z, &mut out);
        out
    }

    /// [`Self::find_path`] with caller-owned buffers. Returns whether the goal was reached.
    pub fn find_path_into(
        &self,
        scratch: &mut PathScratch,
        start_x: f32,
        start_z: f32,
        goal_x: f32,
        goal_z: f32,
        out: &mut Vec<Vec2>,
    ) -> bool {
        let (Some(start), Some(goal)) = (
            self.grid.world_to_grid(start_x, start_z),
            self.grid.world_to_grid(goal_x, goal_z),
        ) else {
            out.clear();
            return false;
        };
        astar::find_path(&self.grid, scratch, start, goal, out)
    }

    /// Rejection-sample a walkable point within `radius` of the center.
    ///
    /// Gives up after a fixed number of attempts and returns `None`.
    pub fn get_random_walkable_position<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center_x: f32,
        center_z: f32,
        radius: f32,
    ) -> Option<Vec2> {
        if !center_x.is_finite() || !center_z.is_finite() || !radius.is_finite() {
            return None;
        }
        let radius = radius.max(0.0);

        for _ in 0..RANDOM_SAMPLE_ATTEMPTS {
            let angle = rng.random::<f32>() * TAU;
            let distance = rng.random::<f32>() * radius;
            let x = center_x + angle.cos() * distance;
            let z = center_z + angle.sin() * distance;
            if self.is_walkable(x, z) {
                return Some(Vec2::new(x, z));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CylinderSpec, ColliderOwner, aabb_from_corners};
    use nalgebra::Vector3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_20() -> Pathfinder {
        Pathfinder::new(20, 1.0, 20.0)
    }

    #[test]
    fn for_world_rounds_grid_size_up() {
        let pf = Pathfinder::for_world(20.5, 1.0);
        assert_eq!(pf.grid().grid_size(), 21);
        assert_eq!(Pathfinder::for_world(100.0, 2.0).grid().grid_size(), 50);
    }

    #[test]
    fn absurd_world_to_cell_ratio_is_capped() {
        let pf = Pathfinder::for_world(1.0e9, 0.001);
        assert_eq!(pf.grid().grid_size(), crate::constants::MAX_NAV_GRID_SIZE);
        assert!(pf.find_path(0.0, 0.0, 1.0e8, 0.0).is_empty());
    }

    #[test]
    fn single_cell_blocking() {
        let mut pf = open_20();
        assert!(pf.is_walkable(3.2, -4.7));
        pf.set_blocked(3.2, -4.7);
        assert!(!pf.is_walkable(3.5, -4.5));
        pf.set_walkable(3.5, -4.5);
        assert!(pf.is_walkable(3.2, -4.7));
    }

    #[test]
    fn out_of_grid_is_not_walkable() {
        let pf = open_20();
        assert!(!pf.is_walkable(10.0, 0.0));
        assert!(!pf.is_walkable(0.0, -10.01));
        assert!(!pf.is_walkable(f32::NAN, 0.0));
        assert!(pf.is_walkable(-10.0, 9.99));
    }

    #[test]
    fn circle_blocks_cells_by_center_distance() {
        let mut pf = open_20();
        pf.set_blocked_circle(0.0, 0.0, 2.0);

        let grid = pf.grid();
        for z in 0..20 {
            for x in 0..20 {
                let c = GridCoord::new(x, z);
                let center = grid.grid_to_world(c);
                assert_eq!(grid.is_blocked(c), center.norm() <= 2.0, "{c:?}");
            }
        }
    }

    #[test]
    fn path_around_a_circle_obstacle() {
        let mut pf = open_20();
        pf.set_blocked_circle(0.0, 0.0, 2.0);

        let path = pf.find_path(-5.0, 0.0, 5.0, 0.0);
        assert!(!path.is_empty());
        for p in &path {
            assert!(p.norm() > 2.0, "waypoint {p:?} inside obstacle");
            assert!(pf.is_walkable(p.x, p.y));
        }
        let goal = path.last().copied().unwrap();
        assert_eq!(pf.grid().world_to_grid(goal.x, goal.y), pf.grid().world_to_grid(5.0, 0.0));
    }

    #[test]
    fn paths_are_symmetric_in_length() {
        let mut pf = open_20();
        pf.set_blocked_circle(0.0, 0.0, 2.0);

        let ab = pf.find_path(-5.0, 0.0, 5.0, 0.0);
        let ba = pf.find_path(5.0, 0.0, -5.0, 0.0);
        assert_eq!(ab.len(), ba.len());
    }

    #[test]
    fn blocked_or_out_of_bounds_goal_gives_empty_path() {
        let mut pf = open_20();
        pf.set_blocked(5.0, 5.0);
        assert!(pf.find_path(0.0, 0.0, 5.0, 5.0).is_empty());
        assert!(pf.find_path(0.0, 0.0, 50.0, 0.0).is_empty());
        assert!(pf.find_path(-50.0, 0.0, 0.0, 0.0).is_empty());
        assert!(pf.find_path(f32::NAN, 0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn blocked_start_can_still_leave() {
        let mut pf = open_20();
        pf.set_blocked(0.0, 0.0);
        assert!(!pf.find_path(0.0, 0.0, 4.0, 0.0).is_empty());
    }

    #[test]
    fn unreachable_goal_gives_empty_path() {
        let mut pf = open_20();
        pf.set_blocked_rect(2.0, -10.0, 2.5, 10.0);
        assert!(pf.find_path(-5.0, 0.0, 5.0, 0.0).is_empty());
    }

    #[test]
    fn find_path_into_reuses_buffers() {
        let pf = open_20();
        let mut scratch = PathScratch::new();
        let mut out = Vec::with_capacity(64);

        assert!(pf.find_path_into(&mut scratch, -9.5, -9.5, 9.5, 9.5, &mut out));
        assert_eq!(out.len(), 19);
        assert!(pf.find_path_into(&mut scratch, 0.5, 0.5, 0.5, 0.5, &mut out));
        assert!(out.is_empty());
        assert!(out.capacity() >= 64);
    }

    #[test]
    fn fence_blocks_only_the_rim() {
        let mut pf = open_20();
        pf.fence_boundary(1.0);

        assert!(!pf.is_walkable(-9.5, 0.5));
        assert!(!pf.is_walkable(0.5, 9.5));
        assert!(pf.is_walkable(-8.5, 0.5));
        assert!(pf.is_walkable(0.5, 0.5));
        assert_eq!(pf.grid().blocked_count(), 20 * 4 - 4);
    }

    #[test]
    fn colliders_are_stamped_into_the_grid() {
        let mut colliders = StaticColliders::default();
        colliders
            .register_cylinder(
                ColliderOwner(1),
                CylinderSpec::new(Vec2::new(-5.0, -5.0), 1.0, 0.0, 2.0),
            )
            .unwrap();
        colliders
            .register_box(
                ColliderOwner(2),
                aabb_from_corners(Vector3::new(4.2, 0.0, 4.2), Vector3::new(5.8, 2.0, 5.8)),
            )
            .unwrap();

        let mut pf = open_20();
        pf.block_colliders(&colliders, 0.0);

        assert!(!pf.is_walkable(-5.0, -5.0));
        assert!(!pf.is_walkable(5.0, 5.0));
        assert!(!pf.is_walkable(4.3, 5.7));
        assert!(pf.is_walkable(0.0, 0.0));

        pf.clear_blocked();
        assert_eq!(pf.grid().blocked_count(), 0);
    }

    #[test]
    fn random_points_stay_in_radius_and_walkable() {
        let mut pf = open_20();
        pf.set_blocked_circle(8.0, 8.0, 1.5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..1000 {
            let p = pf
                .get_random_walkable_position(&mut rng, 0.0, 0.0, 5.0)
                .expect("open area always yields a point");
            assert!(p.norm() <= 5.0 + pf.cell_size());
            assert!(pf.is_walkable(p.x, p.y));
        }
    }

    #[test]
    fn random_sampling_gives_up_on_blocked_area() {
        let mut pf = open_20();
        pf.set_blocked_circle(0.0, 0.0, 4.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(pf.get_random_walkable_position(&mut rng, 0.0, 0.0, 2.0), None);
    }

    #[test]
    fn same_seed_same_wander_target() {
        let pf = open_20();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(
            pf.get_random_walkable_position(&mut a, 1.0, 1.0, 5.0),
            pf.get_random_walkable_position(&mut b, 1.0, 1.0, 5.0)
        );
    }
}
