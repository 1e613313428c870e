use core::fmt;
use grid_util::grid::ValueGrid;
use grid_util::point::Point;

use crate::error::SearchError;
use crate::pathing_grid::PathingGrid;
use crate::search_state::SearchResult;
use crate::solver::GridSolver;

/// How a cell is drawn after a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellMark {
    Unvisited,
    Visited,
    /// On the shortest path. Takes precedence over [CellMark::Visited].
    Path,
}

/// A search between the markers of a grid, flattened into one [CellMark] per cell.
#[derive(Clone, Debug)]
pub struct Visualization<'a> {
    grid: &'a PathingGrid,
    marks: Vec<CellMark>,
    result: SearchResult,
}

impl<'a> Visualization<'a> {
    pub fn new<S: GridSolver>(
        grid: &'a PathingGrid,
        solver: &S,
    ) -> Result<Visualization<'a>, SearchError> {
        let result = solver.search_grid(grid)?;
        let mut marks = vec![CellMark::Unvisited; grid.width() * grid.height()];
        let path = result.path().unwrap_or_default();
        let visited = result.visited_order().iter().map(|p| (p, CellMark::Visited));
        for (p, mark) in visited.chain(path.iter().map(|p| (p, CellMark::Path))) {
            if grid.contains(p) {
                marks[grid.get_ix_point(p)] = mark;
            }
        }
        Ok(Visualization {
            grid,
            marks,
            result,
        })
    }

    fn ix(&self, point: &Point) -> Option<usize> {
        self.grid
            .contains(point)
            .then(|| self.grid.get_ix_point(point))
    }

    /// The mark of `point`; cells outside the grid are [CellMark::Unvisited].
    pub fn mark(&self, point: &Point) -> CellMark {
        self.ix(point)
            .map_or(CellMark::Unvisited, |ix| self.marks[ix])
    }

    pub fn count(&self, mark: CellMark) -> usize {
        self.marks.iter().filter(|&&m| m == mark).count()
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn grid(&self) -> &PathingGrid {
        self.grid
    }
}

/// Draws the grid notation with `o` on visited cells and `*` on path cells.
impl fmt::Display for Visualization<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.grid.height() as i32 {
            let row = self.grid.render_row(y, |p| match self.mark(p) {
                CellMark::Unvisited => None,
                CellMark::Visited => Some('o'),
                CellMark::Path => Some('*'),
            });
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl PathingGrid {
    /// Searches between the start and finish markers with `solver` and marks the visited and path
    /// cells.
    pub fn visualize<S: GridSolver>(&self, solver: &S) -> Result<Visualization<'_>, SearchError> {
        Visualization::new(self, solver)
    }
}
