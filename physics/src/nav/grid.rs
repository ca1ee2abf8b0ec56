//! Occupancy grid encoding helpers.
//!
//! # Model
//! - The grid is `grid_size x grid_size` square cells of `cell_size` world units.
//! - It is centered on the world origin: `world_offset = world_size / 2`.
//! - Cells are linearized Z-major: `index = gz * grid_size + gx`.
//!
//! # Mapping
//! - `gx = floor((x + world_offset) / cell_size)`, same for `gz`.
//! - A cell's world position is its center:
//!   `x = gx * cell_size - world_offset + cell_size / 2`.
//! - Coordinates outside `[0, grid_size)` are not on the grid and count as blocked.

use crate::{
    collision::types::Vec2,
    constants::{MAX_NAV_GRID_SIZE, NAV_CELL_SIZE},
};

/// Integer cell coordinates. May lie outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }
}

#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    /// `true` = blocked.
    blocked: Vec<bool>,
    grid_size: usize,
    cell_size: f32,
    world_offset: f32,
}

impl OccupancyGrid {
    /// Build an all-walkable grid. Invalid sizes are replaced with usable values.
    pub fn new(grid_size: usize, cell_size: f32, world_size: f32) -> Self {
        let grid_size = if grid_size > MAX_NAV_GRID_SIZE {
            log::warn!("nav grid size {grid_size} is too large, using {MAX_NAV_GRID_SIZE}");
            MAX_NAV_GRID_SIZE
        } else {
            grid_size
        };
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            log::warn!("invalid nav cell size {cell_size}, using {NAV_CELL_SIZE}");
            NAV_CELL_SIZE
        };
        let world_size = if world_size.is_finite() && world_size >= 0.0 {
            world_size
        } else {
            log::warn!("invalid nav world size {world_size}, using grid extent");
            grid_size as f32 * cell_size
        };

        Self {
            blocked: vec![false; grid_size * grid_size],
            grid_size,
            cell_size,
            world_offset: world_size * 0.5,
        }
    }

    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn world_offset(&self) -> f32 {
        self.world_offset
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// World position to cell coordinates (possibly off-grid).
    ///
    /// Returns `None` for non-finite input.
    #[inline]
    pub fn world_to_grid(&self, x: f32, z: f32) -> Option<GridCoord> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let gx = ((x + self.world_offset) / self.cell_size).floor();
        let gz = ((z + self.world_offset) / self.cell_size).floor();
        // `as` saturates, so far-away points land far off-grid rather than wrapping.
        Some(GridCoord::new(gx as i32, gz as i32))
    }

    /// World position of a cell's center.
    #[inline]
    pub fn grid_to_world(&self, c: GridCoord) -> Vec2 {
        let half = self.cell_size * 0.5;
        Vec2::new(
            c.x as f32 * self.cell_size - self.world_offset + half,
            c.z as f32 * self.cell_size - self.world_offset + half,
        )
    }

    #[inline]
    pub fn contains(&self, c: GridCoord) -> bool {
        let n = self.grid_size as i64;
        (0..n).contains(&(c.x as i64)) && (0..n).contains(&(c.z as i64))
    }

    /// Linear index of an on-grid cell.
    #[inline]
    pub fn index(&self, c: GridCoord) -> Option<usize> {
        self.contains(c)
            .then(|| c.z as usize * self.grid_size + c.x as usize)
    }

    /// Cell coordinates of a linear index.
    #[inline]
    pub fn coord(&self, index: usize) -> GridCoord {
        GridCoord::new((index % self.grid_size) as i32, (index / self.grid_size) as i32)
    }

    /// Off-grid cells are blocked.
    #[inline]
    pub fn is_blocked(&self, c: GridCoord) -> bool {
        self.index(c).is_none_or(|i| self.blocked[i])
    }

    #[inline]
    pub(crate) fn is_blocked_index(&self, index: usize) -> bool {
        self.blocked[index]
    }

    /// Set one cell. Off-grid coordinates are ignored.
    #[inline]
    pub fn set(&mut self, c: GridCoord, blocked: bool) {
        if let Some(i) = self.index(c) {
            self.blocked[i] = blocked;
        }
    }

    /// Set every on-grid cell in the inclusive coordinate box `[min, max]`
    /// for which `pred(cell_center)` holds.
    pub fn set_where(
        &mut self,
        min: GridCoord,
        max: GridCoord,
        blocked: bool,
        mut pred: impl FnMut(Vec2) -> bool,
    ) {
        if self.grid_size == 0 {
            return;
        }
        let last = self.grid_size as i64 - 1;
        let x0 = (min.x as i64).max(0);
        let x1 = (max.x as i64).min(last);
        let z0 = (min.z as i64).max(0);
        let z1 = (max.z as i64).min(last);

        for gz in z0..=z1 {
            for gx in x0..=x1 {
                let c = GridCoord::new(gx as i32, gz as i32);
                if pred(self.grid_to_world(c)) {
                    let i = gz as usize * self.grid_size + gx as usize;
                    self.blocked[i] = blocked;
                }
            }
        }
    }

    /// Mark every cell walkable again.
    pub fn clear(&mut self) {
        self.blocked.fill(false);
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> OccupancyGrid {
        OccupancyGrid::new(20, 1.0, 20.0)
    }

    #[test]
    fn mapping_is_centered_on_origin() {
        let g = grid();
        assert_eq!(g.world_to_grid(0.0, 0.0), Some(GridCoord::new(10, 10)));
        assert_eq!(g.world_to_grid(-10.0, -10.0), Some(GridCoord::new(0, 0)));
        assert_eq!(g.world_to_grid(9.99, 9.99), Some(GridCoord::new(19, 19)));
        assert_eq!(g.grid_to_world(GridCoord::new(10, 10)), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn cell_center_maps_back_to_its_cell() {
        let g = OccupancyGrid::new(64, 2.5, 160.0);
        for (x, z) in [(0, 0), (63, 0), (17, 42), (63, 63)] {
            let c = GridCoord::new(x, z);
            let w = g.grid_to_world(c);
            assert_eq!(g.world_to_grid(w.x, w.y), Some(c));
        }
    }

    #[test]
    fn off_grid_is_blocked() {
        let g = grid();
        assert!(g.is_blocked(GridCoord::new(-1, 0)));
        assert!(g.is_blocked(GridCoord::new(0, 20)));
        assert!(!g.is_blocked(GridCoord::new(0, 19)));
        assert_eq!(g.world_to_grid(f32::NAN, 0.0), None);
    }

    #[test]
    fn far_points_do_not_wrap() {
        let g = grid();
        let c = g.world_to_grid(1.0e30, -1.0e30).unwrap();
        assert!(!g.contains(c));
    }

    #[test]
    fn index_and_coord_round_trip() {
        let g = grid();
        let c = GridCoord::new(7, 13);
        let i = g.index(c).unwrap();
        assert_eq!(g.coord(i), c);
    }

    #[test]
    fn oversized_grids_are_clamped() {
        let g = OccupancyGrid::new(usize::MAX, 1.0, 100.0);
        assert_eq!(g.grid_size(), MAX_NAV_GRID_SIZE);
        assert_eq!(g.len(), MAX_NAV_GRID_SIZE * MAX_NAV_GRID_SIZE);
    }

    #[test]
    fn invalid_sizes_are_sanitized() {
        let g = OccupancyGrid::new(10, -1.0, f32::NAN);
        assert_eq!(g.cell_size(), NAV_CELL_SIZE);
        assert!((g.world_offset() - 5.0).abs() < 1.0e-6);
    }
}
