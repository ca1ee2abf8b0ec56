//! A* over the occupancy grid.
//!
//! 8-connected, straight steps cost 1 and diagonal steps cost √2 (in cells), with the
//! matching octile heuristic, which is consistent, so the first time the goal is popped
//! the path is optimal. A diagonal step may not cut past a blocked orthogonal neighbour.
//!
//! Open-set ties are broken by lowest `f`, then by insertion order, so identical
//! queries always return identical paths.
//!
//! All per-search buffers live in [`PathScratch`]. Reusing one scratch (and one output
//! `Vec`) across queries makes repeated searches allocation-free once warmed up.

use std::{cmp::Ordering, collections::BinaryHeap, f32::consts::SQRT_2};

use super::grid::{GridCoord, OccupancyGrid};
use crate::collision::types::Vec2;

const NO_PARENT: u32 = u32::MAX;

/// N, NE, E, SE, S, SW, W, NW.
const NEIGHBORS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f: f32,
    g: f32,
    seq: u32,
    index: u32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    /// Reversed so `BinaryHeap` (a max-heap) pops the lowest `f`, then the oldest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Reusable A* working memory.
///
/// Per-cell state is tagged with a generation number so starting a new search does
/// not need to clear the buffers.
#[derive(Debug, Default)]
pub struct PathScratch {
    open: BinaryHeap<OpenNode>,
    g: Vec<f32>,
    parent: Vec<u32>,
    /// Generation in which `g`/`parent` were last written.
    seen: Vec<u32>,
    /// Generation in which the cell was closed.
    closed: Vec<u32>,
    generation: u32,
    seq: u32,
    /// Cells expanded by the last search.
    expanded: usize,
}

impl PathScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells expanded by the most recent search.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn begin(&mut self, cells: usize) {
        if self.g.len() != cells {
            self.g = vec![f32::INFINITY; cells];
            self.parent = vec![NO_PARENT; cells];
            self.seen = vec![0; cells];
            self.closed = vec![0; cells];
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale tags could alias the new generation.
            self.seen.fill(0);
            self.closed.fill(0);
            self.generation = 1;
        }
        self.open.clear();
        self.seq = 0;
        self.expanded = 0;
    }

    #[inline]
    fn g_of(&self, i: usize) -> f32 {
        if self.seen[i] == self.generation {
            self.g[i]
        } else {
            f32::INFINITY
        }
    }

    #[inline]
    fn parent_of(&self, i: usize) -> u32 {
        if self.seen[i] == self.generation {
            self.parent[i]
        } else {
            NO_PARENT
        }
    }

    #[inline]
    fn record(&mut self, i: usize, g: f32, parent: u32) {
        self.g[i] = g;
        self.parent[i] = parent;
        self.seen[i] = self.generation;
    }

    #[inline]
    fn is_closed(&self, i: usize) -> bool {
        self.closed[i] == self.generation
    }

    #[inline]
    fn push(&mut self, index: usize, g: f32, h: f32) {
        self.open.push(OpenNode {
            f: g + h,
            g,
            seq: self.seq,
            index: index as u32,
        });
        self.seq = self.seq.wrapping_add(1);
    }
}

/// Octile distance between two cells, in cell units.
#[inline]
fn octile(a: GridCoord, b: GridCoord) -> f32 {
    let dx = (a.x - b.x).unsigned_abs() as f32;
    let dz = (a.z - b.z).unsigned_abs() as f32;
    let (lo, hi) = if dx < dz { (dx, dz) } else { (dz, dx) };
    (hi - lo) + SQRT_2 * lo
}

/// Search from `start` to `goal`, writing waypoints (cell centers, start excluded,
/// goal included) into `out`.
///
/// Returns `true` when the goal was reached. `start == goal` reaches trivially with an
/// empty path. Off-grid endpoints and a blocked goal fail immediately; a blocked start
/// is allowed so an agent nudged into an obstacle can still walk out.
pub fn find_path(
    grid: &OccupancyGrid,
    scratch: &mut PathScratch,
    start: GridCoord,
    goal: GridCoord,
    out: &mut Vec<Vec2>,
) -> bool {
    out.clear();

    let (Some(start_i), Some(goal_i)) = (grid.index(start), grid.index(goal)) else {
        return false;
    };
    if grid.is_blocked_index(goal_i) {
        return false;
    }
    if start_i == goal_i {
        return true;
    }

    scratch.begin(grid.len());
    scratch.record(start_i, 0.0, NO_PARENT);
    scratch.push(start_i, 0.0, octile(start, goal));

    while let Some(node) = scratch.open.pop() {
        let current_i = node.index as usize;
        if scratch.is_closed(current_i) || node.g > scratch.g_of(current_i) {
            continue;
        }
        scratch.closed[current_i] = scratch.generation;
        scratch.expanded += 1;

        if current_i == goal_i {
            reconstruct(grid, scratch, goal_i, out);
            return true;
        }

        let current = grid.coord(current_i);
        for (dx, dz) in NEIGHBORS {
            let next = current.offset(dx, dz);
            let Some(next_i) = grid.index(next) else {
                continue;
            };
            if grid.is_blocked_index(next_i) || scratch.is_closed(next_i) {
                continue;
            }

            let diagonal = dx != 0 && dz != 0;
            if diagonal
                && (grid.is_blocked(current.offset(dx, 0)) || grid.is_blocked(current.offset(0, dz)))
            {
                continue;
            }

            let step = if diagonal { SQRT_2 } else { 1.0 };
            let tentative = node.g + step;
            if tentative < scratch.g_of(next_i) {
                scratch.record(next_i, tentative, current_i as u32);
                scratch.push(next_i, tentative, octile(next, goal));
            }
        }
    }

    false
}

/// Walk parents back from the goal and emit world-space waypoints in travel order.
fn reconstruct(grid: &OccupancyGrid, scratch: &PathScratch, goal_i: usize, out: &mut Vec<Vec2>) {
    let mut i = goal_i;
    loop {
        let parent = scratch.parent_of(i);
        if parent == NO_PARENT {
            // `i` is the start cell, which is not part of the path.
            break;
        }
        out.push(grid.grid_to_world(grid.coord(i)));
        i = parent as usize;
    }
    out.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> OccupancyGrid {
        OccupancyGrid::new(20, 1.0, 20.0)
    }

    #[test]
    fn open_node_pops_lowest_f_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenNode { f: 2.0, g: 0.0, seq: 0, index: 0 });
        heap.push(OpenNode { f: 1.0, g: 0.0, seq: 2, index: 1 });
        heap.push(OpenNode { f: 1.0, g: 0.0, seq: 1, index: 2 });

        assert_eq!(heap.pop().map(|n| n.index), Some(2));
        assert_eq!(heap.pop().map(|n| n.index), Some(1));
        assert_eq!(heap.pop().map(|n| n.index), Some(0));
    }

    #[test]
    fn straight_line_path_excludes_start_and_includes_goal() {
        let grid = open_grid();
        let mut scratch = PathScratch::new();
        let mut out = Vec::new();

        assert!(find_path(&grid, &mut scratch, GridCoord::new(2, 5), GridCoord::new(6, 5), &mut out));
        assert_eq!(out.len(), 4);
        assert_eq!(out.last().copied(), Some(grid.grid_to_world(GridCoord::new(6, 5))));
        assert_eq!(out[0], grid.grid_to_world(GridCoord::new(3, 5)));
    }

    #[test]
    fn diagonal_moves_are_used() {
        let grid = open_grid();
        let mut scratch = PathScratch::new();
        let mut out = Vec::new();

        assert!(find_path(&grid, &mut scratch, GridCoord::new(0, 0), GridCoord::new(5, 5), &mut out));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn diagonal_cannot_cut_a_blocked_corner() {
        let mut grid = open_grid();
        grid.set(GridCoord::new(1, 0), true);
        let mut scratch = PathScratch::new();
        let mut out = Vec::new();

        assert!(find_path(&grid, &mut scratch, GridCoord::new(0, 0), GridCoord::new(1, 1), &mut out));
        // Must go via (0, 1) instead of jumping diagonally past (1, 0).
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], grid.grid_to_world(GridCoord::new(0, 1)));
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let mut grid = open_grid();
        for z in 0..20 {
            grid.set(GridCoord::new(10, z), true);
        }
        let mut scratch = PathScratch::new();
        let mut out = vec![Vec2::zeros()];

        assert!(!find_path(&grid, &mut scratch, GridCoord::new(2, 2), GridCoord::new(15, 2), &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn scratch_is_reusable_between_searches() {
        let mut grid = open_grid();
        let mut scratch = PathScratch::new();
        let mut out = Vec::new();

        assert!(find_path(&grid, &mut scratch, GridCoord::new(0, 0), GridCoord::new(19, 0), &mut out));
        let first = out.clone();

        grid.set(GridCoord::new(10, 0), true);
        assert!(find_path(&grid, &mut scratch, GridCoord::new(0, 0), GridCoord::new(19, 0), &mut out));
        assert_ne!(first, out);
        assert!(out.iter().all(|p| {
            let c = grid.world_to_grid(p.x, p.y).unwrap();
            !grid.is_blocked(c)
        }));
    }

    #[test]
    fn same_cell_is_trivially_reached() {
        let grid = open_grid();
        let mut scratch = PathScratch::new();
        let mut out = Vec::new();
        assert!(find_path(&grid, &mut scratch, GridCoord::new(4, 4), GridCoord::new(4, 4), &mut out));
        assert!(out.is_empty());
    }
}
