use grid_util::point::Point;

use crate::{pathing_grid::PathingGrid, search_state::SearchState, solver::reach_neighbours};

use super::GridSolver;

/// Selects the next cell by scanning every unfinalized cell of the grid for the smallest distance.
/// Quadratic in the number of cells; mostly useful as a reference for [FrontierSolver](super::frontier::FrontierSolver).
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanSolver;

impl GridSolver for ScanSolver {
    fn expand(&self, grid: &PathingGrid, state: &mut SearchState, finish: Point) {
        // Kept in row-major order so the first minimum found is also the row-major tie-break.
        let mut unvisited = grid
            .cells()
            .filter(|p| !state.is_visited(p))
            .collect::<Vec<Point>>();
        loop {
            let closest = unvisited
                .iter()
                .enumerate()
                .filter_map(|(position, p)| state.distance(p).map(|d| (position, d)))
                .min_by_key(|&(_, distance)| distance);
            // Only unreached cells are left, or none at all.
            let Some((position, _)) = closest else {
                break;
            };
            let cell = unvisited.remove(position);
            let Some(index) = state.index_of(&cell) else {
                break;
            };
            if state.finalize(index).is_none() {
                continue;
            }
            if cell == finish {
                return;
            }
            reach_neighbours(grid, state, index, &cell);
        }
    }
}
