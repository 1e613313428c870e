use grid_util::point::Point;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{pathing_grid::PathingGrid, search_state::SearchState, solver::reach_neighbours};

use super::GridSolver;

/// Reached but unfinalized cell waiting in the frontier heap.
struct FrontierEntry {
    distance: u32,
    row: i32,
    col: i32,
    index: usize,
}

impl FrontierEntry {
    fn new(cell: &Point, distance: u32, index: usize) -> FrontierEntry {
        FrontierEntry {
            distance,
            row: cell.y,
            col: cell.x,
            index,
        }
    }
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the closest cell, then the lowest row, then the lowest column
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.row.cmp(&self.row))
            .then_with(|| other.col.cmp(&self.col))
    }
}

/// Keeps the reached cells in a binary heap ordered by (distance, row, column). With unit step
/// costs and first-reach-wins, every cell enters the heap exactly once.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontierSolver;

impl GridSolver for FrontierSolver {
    fn expand(&self, grid: &PathingGrid, state: &mut SearchState, finish: Point) {
        let mut frontier = state
            .iter()
            .filter(|(_, _, node)| !node.visited)
            .map(|(index, cell, node)| FrontierEntry::new(cell, node.distance, index))
            .collect::<BinaryHeap<FrontierEntry>>();
        while let Some(FrontierEntry { index, .. }) = frontier.pop() {
            let Some((cell, distance)) = state.finalize(index) else {
                continue;
            };
            if cell == finish {
                return;
            }
            for (neighbour, neighbour_ix) in reach_neighbours(grid, state, index, &cell) {
                frontier.push(FrontierEntry::new(&neighbour, distance + 1, neighbour_ix));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cell, ScanSolver};

    #[test]
    fn heap_pops_closest_then_row_major() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry::new(&cell(0, 3), 2, 0));
        heap.push(FrontierEntry::new(&cell(2, 0), 1, 1));
        heap.push(FrontierEntry::new(&cell(1, 4), 1, 2));
        heap.push(FrontierEntry::new(&cell(1, 2), 1, 3));
        let order = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect::<Vec<_>>();
        assert_eq!(order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn matches_scan_on_maze() {
        let grid: PathingGrid = "
            S.#.....
            .##.###.
            ....#...
            .####.#.
            ......#F
        "
        .parse()
        .unwrap();
        let frontier = FrontierSolver.search_grid(&grid).unwrap();
        let scan = ScanSolver.search_grid(&grid).unwrap();
        assert_eq!(frontier.visited_order(), scan.visited_order());
        assert_eq!(frontier.path(), scan.path());
        assert!(frontier.is_reachable());
    }
}
