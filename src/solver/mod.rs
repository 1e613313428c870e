use crate::error::SearchError;
use crate::pathing_grid::PathingGrid;
use crate::search_state::{SearchOutcome, SearchResult, SearchState};
use crate::N_SMALLVEC_SIZE;
use grid_util::point::Point;
use log::{info, warn};
use smallvec::SmallVec;

pub mod frontier;
pub mod scan;

/// A breadth-first shortest-path search over a [PathingGrid].
///
/// Implementors only decide how the next cell to finalize is selected; every solver must finalize
/// cells in order of increasing distance, breaking ties in row-major order, so that all solvers
/// produce the same visited order.
pub trait GridSolver {
    /// Finalizes cells starting from those already reached in `state` until `finish` has been
    /// visited or no reached cell is left.
    fn expand(&self, grid: &PathingGrid, state: &mut SearchState, finish: Point);

    /// Searches from `start` to `finish`. The grid is only read; all bookkeeping goes into the
    /// [SearchState] of the returned [SearchResult].
    ///
    /// A blocked start visits nothing and a blocked or walled-off finish exhausts every cell
    /// reachable from the start; both end as [SearchOutcome::Unreachable].
    fn search(
        &self,
        grid: &PathingGrid,
        start: Point,
        finish: Point,
    ) -> Result<SearchResult, SearchError> {
        for endpoint in [start, finish] {
            if !grid.contains(&endpoint) {
                return Err(SearchError::OutOfBounds(endpoint));
            }
        }
        if grid.is_blocked(&start) {
            warn!("Start {} is a wall, nothing to search", start);
            return Ok(SearchResult::new(start, finish, SearchState::empty()));
        }
        let mut state = SearchState::new(start);
        self.expand(grid, &mut state, finish);
        let result = SearchResult::new(start, finish, state);
        match result.outcome() {
            SearchOutcome::Reachable { distance } => info!(
                "{} reached from {} in {} steps after visiting {} cells",
                finish,
                start,
                distance,
                result.visited_order().len()
            ),
            SearchOutcome::Unreachable => info!(
                "{} is not reachable from {}, visited {} cells",
                finish,
                start,
                result.visited_order().len()
            ),
        }
        Ok(result)
    }

    /// Searches between the start and finish markers of the grid.
    fn search_grid(&self, grid: &PathingGrid) -> Result<SearchResult, SearchError> {
        self.search(grid, grid.start(), grid.finish())
    }
}

/// Reaches the open, not yet reached neighbours of the cell at table index `index`, giving them
/// its distance plus one. Returns the newly reached cells with their table index.
pub(crate) fn reach_neighbours(
    grid: &PathingGrid,
    state: &mut SearchState,
    index: usize,
    cell: &Point,
) -> SmallVec<[(Point, usize); N_SMALLVEC_SIZE]> {
    grid.passable_neighbours(cell)
        .into_iter()
        .filter_map(|neighbour| {
            state
                .reach(neighbour, index)
                .map(|neighbour_ix| (neighbour, neighbour_ix))
        })
        .collect()
}
