//! # grid_pathfinder
//!
//! The search core of a grid pathfinding visualizer. A [PathingGrid] holds walls plus a start
//! and a finish cell; a [GridSolver] runs a breadth-first shortest-path search between them and
//! reports both the order in which cells were finalized ("visited") and the shortest path.
//!
//! Movement is restricted to the 4-neighbourhood and every step costs 1. Cells are finalized in
//! order of increasing distance with ties broken in row-major order, so the visited order is fully
//! deterministic. All per-search bookkeeping lives in a [SearchState] owned by the returned
//! [SearchResult], which means the grid is never mutated by a search and needs no reset between
//! runs.
//!
//! Cells are addressed as (row, column). They are represented by [Point] with `x` holding the
//! column and `y` the row; [cell] builds one from a (row, column) pair.
mod error;
pub mod pathing_grid;
pub mod search_state;
pub mod solver;
pub mod visualization;

pub use crate::error::{GridError, SearchError};
pub use crate::pathing_grid::PathingGrid;
pub use crate::search_state::{reconstruct_path, SearchOutcome, SearchResult, SearchState};
pub use crate::solver::{frontier::FrontierSolver, scan::ScanSolver, GridSolver};
pub use crate::visualization::{CellMark, Visualization};

use grid_util::point::Point;

/// Width and height of the default board.
pub const GRID_SIZE: usize = 20;
/// (row, column) of the start marker on the default board.
pub const DEFAULT_START: (i32, i32) = (10, 5);
/// (row, column) of the finish marker on the default board.
pub const DEFAULT_FINISH: (i32, i32) = (10, 15);
/// Inline capacity of neighbourhood buffers: a cell has at most 4 orthogonal neighbours.
pub const N_SMALLVEC_SIZE: usize = 4;

/// Builds the [Point] of the cell at the given row and column.
pub fn cell(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

/// Number of orthogonal steps between two cells.
pub fn manhattan_distance(a: &Point, b: &Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Whether `b` is one up, down, left or right of `a`.
pub fn is_orthogonal_step(a: &Point, b: &Point) -> bool {
    manhattan_distance(a, b) == 1
}

/// Runs a shortest-path search from `start` to `finish` using the default [FrontierSolver].
///
/// The visited order is available through [SearchResult::visited_order] and the path through
/// [SearchResult::path]. Fails only if `start` or `finish` lies outside the grid.
pub fn search(grid: &PathingGrid, start: Point, finish: Point) -> Result<SearchResult, SearchError> {
    FrontierSolver.search(grid, start, finish)
}
