/*!
Grid navigation.

- grid:       square occupancy grid centered on the world origin (world <-> cell mapping)
- astar:      8-connected A* with reusable scratch buffers
- pathfinder: blocking API, path and random walkable point queries
*/

pub mod astar;
pub mod grid;
pub mod pathfinder;

pub use astar::PathScratch;
pub use grid::{GridCoord, OccupancyGrid};
pub use pathfinder::Pathfinder;
