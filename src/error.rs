use core::fmt;
use grid_util::point::Point;

/// Reasons a search cannot be started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// The start or finish cell does not belong to the grid.
    OutOfBounds(Point),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::OutOfBounds(p) => {
                write!(f, "cell at row {} column {} is outside the grid", p.y, p.x)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Errors raised while editing or parsing a [PathingGrid](crate::PathingGrid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds(Point),
    Empty,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownTile {
        tile: char,
        row: usize,
        col: usize,
    },
    MissingStart,
    MissingFinish,
    DuplicateStart(Point),
    DuplicateFinish(Point),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::OutOfBounds(p) => {
                write!(f, "cell at row {} column {} is outside the grid", p.y, p.x)
            }
            GridError::Empty => write!(f, "grid has no rows"),
            GridError::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            GridError::UnknownTile { tile, row, col } => {
                write!(f, "unknown tile {tile:?} at row {row} column {col}")
            }
            GridError::MissingStart => write!(f, "grid has no start cell"),
            GridError::MissingFinish => write!(f, "grid has no finish cell"),
            GridError::DuplicateStart(p) => {
                write!(f, "second start cell at row {} column {}", p.y, p.x)
            }
            GridError::DuplicateFinish(p) => {
                write!(f, "second finish cell at row {} column {}", p.y, p.x)
            }
        }
    }
}

impl std::error::Error for GridError {}
