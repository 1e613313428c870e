//! Per-search bookkeeping. Distances, finalization flags and predecessor links are kept in an
//! insertion-ordered table owned by a single search instead of on the grid cells themselves, so
//! a grid can be searched any number of times without being reset.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// What a search knows about a cell it has reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeState {
    /// Steps from the start.
    pub distance: u32,
    /// Table index of the cell that first reached this one; [None] for the start.
    pub predecessor: Option<usize>,
    /// Whether the distance has been finalized.
    pub visited: bool,
}

/// The table a single search fills in. Cells absent from the table are unreached.
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    nodes: FxIndexMap<Point, NodeState>,
    visited_order: Vec<Point>,
}

impl SearchState {
    /// A table in which nothing has been reached, used when the start itself is not passable.
    pub fn empty() -> SearchState {
        SearchState::default()
    }

    /// A table containing only `start` at distance 0.
    pub fn new(start: Point) -> SearchState {
        let mut state = SearchState::default();
        state.nodes.insert(
            start,
            NodeState {
                distance: 0,
                predecessor: None,
                visited: false,
            },
        );
        state
    }

    /// Number of reached cells, finalized or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, cell: &Point) -> Option<&NodeState> {
        self.nodes.get(cell)
    }

    pub fn index_of(&self, cell: &Point) -> Option<usize> {
        self.nodes.get_index_of(cell)
    }

    /// Reached cells in the order they were first reached, with their table index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Point, &NodeState)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, (cell, node))| (index, cell, node))
    }

    pub fn distance(&self, cell: &Point) -> Option<u32> {
        self.node(cell).map(|node| node.distance)
    }

    pub fn predecessor(&self, cell: &Point) -> Option<Point> {
        self.node(cell)
            .and_then(|node| node.predecessor)
            .and_then(|index| self.nodes.get_index(index))
            .map(|(p, _)| *p)
    }

    pub fn is_visited(&self, cell: &Point) -> bool {
        self.node(cell).map_or(false, |node| node.visited)
    }

    /// Cells in the order their distance was finalized.
    pub fn visited_order(&self) -> &[Point] {
        &self.visited_order
    }

    /// Records that `cell` was reached from the cell at table index `from`. The first reach wins:
    /// a cell already in the table keeps its distance and predecessor. Returns the new table
    /// index if the cell was reached for the first time.
    pub(crate) fn reach(&mut self, cell: Point, from: usize) -> Option<usize> {
        let distance = self.nodes.get_index(from)?.1.distance + 1;
        match self.nodes.entry(cell) {
            Vacant(e) => {
                let index = e.index();
                e.insert(NodeState {
                    distance,
                    predecessor: Some(from),
                    visited: false,
                });
                Some(index)
            }
            Occupied(_) => None,
        }
    }

    /// Locks in the distance of the cell at `index` and appends it to the visited order.
    /// Returns the cell and its distance, or [None] if it was already finalized.
    pub(crate) fn finalize(&mut self, index: usize) -> Option<(Point, u32)> {
        let (cell, node) = self.nodes.get_index_mut(index)?;
        if node.visited {
            return None;
        }
        node.visited = true;
        let finalized = (*cell, node.distance);
        self.visited_order.push(finalized.0);
        Some(finalized)
    }
}

/// Walks the predecessor chain back from `finish` and returns the cells from the start of the
/// chain to `finish`, inclusive.
///
/// If `finish` was never reached the result is just `[finish]`, which does not begin at the search
/// start. [SearchResult::path] performs that check for you.
pub fn reconstruct_path(state: &SearchState, finish: Point) -> Vec<Point> {
    let Some(finish_ix) = state.index_of(&finish) else {
        return vec![finish];
    };
    let mut path: Vec<Point> = std::iter::successors(Some(finish_ix), |&ix| {
        state.nodes.get_index(ix).and_then(|(_, node)| node.predecessor)
    })
    .filter_map(|ix| state.nodes.get_index(ix).map(|(cell, _)| *cell))
    .collect();
    path.reverse();
    path
}

/// Whether the finish was visited by a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The finish was visited `distance` steps away from the start.
    Reachable { distance: u32 },
    /// Every cell reachable from the start was visited without meeting the finish.
    Unreachable,
}

/// The outcome of one search together with the table it filled in.
#[derive(Clone, Debug)]
pub struct SearchResult {
    start: Point,
    finish: Point,
    state: SearchState,
}

impl SearchResult {
    pub(crate) fn new(start: Point, finish: Point, state: SearchState) -> SearchResult {
        SearchResult {
            start,
            finish,
            state,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn finish(&self) -> Point {
        self.finish
    }

    pub fn outcome(&self) -> SearchOutcome {
        match self.state.node(&self.finish) {
            Some(node) if node.visited => SearchOutcome::Reachable {
                distance: node.distance,
            },
            _ => SearchOutcome::Unreachable,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self.outcome(), SearchOutcome::Reachable { .. })
    }

    /// Cells in the order they were finalized. Ends with the finish when it was reachable.
    pub fn visited_order(&self) -> &[Point] {
        self.state.visited_order()
    }

    pub fn distance(&self, cell: &Point) -> Option<u32> {
        self.state.distance(cell)
    }

    /// The raw predecessor walk from the finish; see [reconstruct_path].
    pub fn reconstruct_path(&self) -> Vec<Point> {
        reconstruct_path(&self.state, self.finish)
    }

    /// The shortest path from start to finish, both included, or [None] if the finish was not
    /// reached.
    pub fn path(&self) -> Option<Vec<Point>> {
        if !self.is_reachable() {
            return None;
        }
        let path = self.reconstruct_path();
        (path.first() == Some(&self.start)).then_some(path)
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn into_state(self) -> SearchState {
        self.state
    }
}
