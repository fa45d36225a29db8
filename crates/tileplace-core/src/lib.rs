//! Tile placement optimizer.
//!
//! Places a limited number of 2x2 normal and frozen tiles on a board so the
//! shortest start-to-end path scores as high as possible.
//!
//! ```
//! use tileplace_core::{find_optimal_tile_placement, Grid, Optimizer};
//!
//! let grid = Grid::from_string(
//!     "
//!     S.......
//!     ........
//!     ........
//!     .......E
//!     ",
//! )
//! .unwrap();
//! let mut optimizer = Optimizer::with_seed(42);
//! let report = find_optimal_tile_placement(&grid, 1, 1, &mut optimizer).unwrap();
//! assert!(report.best_score >= report.original_score);
//! ```

pub mod board;
mod error;
pub mod grid;
pub mod path;
pub mod report;
pub mod score;
pub mod search;
pub mod settings;

#[cfg(test)]
mod scenarios;

pub use board::{BoardDescription, Coord, GameRequest, Problem, StaticTower};
pub use error::{Error, Result};
pub use grid::{overlaps, Cell, Grid, Position};
pub use path::{optimize_diagonal_path, shortest_path, Route};
pub use report::{find_optimal_tile_placement, PlacementReport};
pub use score::{score, ScoreParams};
pub use search::{
    sample_non_overlapping, Combination, Optimizer, Placement, SamplePool, SearchConfig,
};
pub use settings::{solve, Algorithm, SolveResponse, SolverSettings};
