use crate::error::GridError;
use crate::{cell, DEFAULT_FINISH, DEFAULT_START, GRID_SIZE, N_SMALLVEC_SIZE};
use core::fmt;
use core::str::FromStr;
use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Orthogonal neighbour offsets as (dx, dy), in expansion order: up, down, left, right.
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// [PathingGrid] stores which cells are walls ([true] in the [BoolGrid]) together with the start
/// and finish markers. It also maintains the connected components of open cells in a [UnionFind]
/// so that connectivity can be queried without running a search.
/// Implements [ValueGrid] by building on [BoolGrid].
#[derive(Clone, Debug)]
pub struct PathingGrid {
    grid: BoolGrid,
    start: Point,
    finish: Point,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Default for PathingGrid {
    /// The 20 by 20 board with the start and finish ten columns apart on the middle row.
    fn default() -> PathingGrid {
        let mut pathing_grid = PathingGrid::new(GRID_SIZE, GRID_SIZE, false);
        pathing_grid.start = cell(DEFAULT_START.0, DEFAULT_START.1);
        pathing_grid.finish = cell(DEFAULT_FINISH.0, DEFAULT_FINISH.1);
        pathing_grid
    }
}

impl PathingGrid {
    /// Start and finish placement for a fresh grid: middle row, a quarter of the width in from
    /// either side.
    pub fn default_endpoints(width: usize, height: usize) -> (Point, Point) {
        let row = (height / 2) as i32;
        (
            cell(row, (width / 4) as i32),
            cell(row, (3 * width / 4) as i32),
        )
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn finish(&self) -> Point {
        self.finish
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.point_in_bounds(*point)
    }

    /// Whether `point` is a wall. Cells outside the grid count as blocked.
    pub fn is_blocked(&self, point: &Point) -> bool {
        !self.contains(point) || self.grid.get(point.x, point.y)
    }

    pub fn can_move_to(&self, point: &Point) -> bool {
        !self.is_blocked(point)
    }

    /// In-bounds orthogonal neighbours of `point` in the order up, down, left, right.
    pub fn neighborhood_points(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NEUMANN_OFFSETS
            .iter()
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.contains(p))
            .collect()
    }

    /// The neighbours a search may step to from `point`.
    pub fn passable_neighbours(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        self.neighborhood_points(point)
            .into_iter()
            .filter(|p| self.can_move_to(p))
            .collect()
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        iproduct!(0..self.height() as i32, 0..self.width() as i32).map(|(y, x)| Point::new(x, y))
    }

    pub fn passable_count(&self) -> usize {
        self.cells().filter(|p| self.can_move_to(p)).count()
    }

    fn check_bounds(&self, point: Point) -> Result<(), GridError> {
        if self.contains(&point) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds(point))
        }
    }

    /// Flips a cell between wall and open. Toggling the start or finish cell is ignored.
    /// Returns whether the cell is a wall afterwards.
    pub fn toggle_wall(&mut self, point: Point) -> Result<bool, GridError> {
        self.check_bounds(point)?;
        if point == self.start || point == self.finish {
            debug!("Ignoring wall toggle on endpoint {}", point);
            return Ok(self.is_blocked(&point));
        }
        let blocked = !self.is_blocked(&point);
        self.set(point.x, point.y, blocked);
        Ok(blocked)
    }

    /// Moves the start marker, clearing any wall on the target cell. The start may share its cell
    /// with the finish.
    pub fn set_start(&mut self, point: Point) -> Result<(), GridError> {
        self.check_bounds(point)?;
        self.set(point.x, point.y, false);
        self.start = point;
        Ok(())
    }

    /// Moves the finish marker, clearing any wall on the target cell.
    pub fn set_finish(&mut self, point: Point) -> Result<(), GridError> {
        self.check_bounds(point)?;
        self.set(point.x, point.y, false);
        self.finish = point;
        Ok(())
    }

    /// Removes every wall and puts the markers back at [default_endpoints](Self::default_endpoints).
    pub fn clear(&mut self) {
        info!("Clearing {}x{} grid", self.width(), self.height());
        *self = PathingGrid::new(self.width(), self.height(), false);
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.contains(point)
            .then(|| self.components.find(self.get_ix_point(point)))
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Checks if `a` and `b` are open cells on the same component, regenerating the components
    /// first if walls were added since they were last built.
    pub fn reachable(&mut self, a: &Point, b: &Point) -> bool {
        self.update();
        self.can_move_to(a)
            && self.can_move_to(b)
            && self.components.equiv(self.get_ix_point(a), self.get_ix_point(b))
    }

    /// Checks if `a` and `b` are not connected.
    pub fn unreachable(&mut self, a: &Point, b: &Point) -> bool {
        !self.reachable(a, b)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up orthogonally adjacent open cells.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        let mut components = UnionFind::new(self.width() * self.height());
        for point in self.cells().filter(|p| self.can_move_to(p)) {
            let point_ix = self.get_ix_point(&point);
            [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)]
                .into_iter()
                .filter(|p| self.can_move_to(p))
                .for_each(|p| {
                    components.union(point_ix, self.get_ix_point(&p));
                });
        }
        self.components = components;
        self.components_dirty = false;
    }

    /// Marker letters are lowercase when the marker sits on a wall.
    fn tile(&self, point: &Point) -> char {
        let blocked = self.is_blocked(point);
        let marker = match (*point == self.start, *point == self.finish) {
            (true, true) => 'B',
            (true, false) => 'S',
            (false, true) => 'F',
            (false, false) => return if blocked { '#' } else { '.' },
        };
        if blocked {
            marker.to_ascii_lowercase()
        } else {
            marker
        }
    }

    /// One row of the text notation, with `overlay` deciding the glyph of open cells.
    pub(crate) fn render_row<F>(&self, y: i32, overlay: F) -> String
    where
        F: Fn(&Point) -> Option<char>,
    {
        (0..self.width() as i32)
            .map(|x| {
                let p = Point::new(x, y);
                match self.tile(&p) {
                    '.' => overlay(&p).unwrap_or('.'),
                    tile => tile,
                }
            })
            .join("")
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height() as i32 {
            writeln!(f, "{}", self.render_row(y, |_| None))?;
        }
        Ok(())
    }
}

/// Parses the text notation: one line per row, `.` open, `#` wall, `S` start, `F` finish and `B`
/// for a start and finish sharing a cell. A lowercase `s`, `f` or `b` puts the marker on a wall.
/// Blank lines and surrounding whitespace are ignored.
impl FromStr for PathingGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<&str>>();
        let width = rows
            .first()
            .map(|line| line.chars().count())
            .ok_or(GridError::Empty)?;
        let mut pathing_grid = PathingGrid::new(width, rows.len(), false);
        let mut start = None;
        let mut finish = None;
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, tile) in line.chars().enumerate() {
                let point = cell(row as i32, col as i32);
                let (marks_start, marks_finish) = match tile.to_ascii_uppercase() {
                    '.' | '#' => (false, false),
                    'S' => (true, false),
                    'F' => (false, true),
                    'B' => (true, true),
                    _ => return Err(GridError::UnknownTile { tile, row, col }),
                };
                if tile == '#' || tile.is_ascii_lowercase() {
                    pathing_grid.grid.set_point(point, true);
                }
                if marks_start && start.replace(point).is_some() {
                    return Err(GridError::DuplicateStart(point));
                }
                if marks_finish && finish.replace(point).is_some() {
                    return Err(GridError::DuplicateFinish(point));
                }
            }
        }
        pathing_grid.start = start.ok_or(GridError::MissingStart)?;
        pathing_grid.finish = finish.ok_or(GridError::MissingFinish)?;
        pathing_grid.generate_components();
        Ok(pathing_grid)
    }
}

impl ValueGrid<bool> for PathingGrid {
    /// Creates a grid filled with `default_value` walls. The cells under the
    /// [default endpoints](PathingGrid::default_endpoints) are always left open.
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        let (start, finish) = PathingGrid::default_endpoints(width, height);
        let mut base_grid = PathingGrid {
            grid: BoolGrid::new(width, height, default_value),
            start,
            finish,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        for endpoint in [start, finish] {
            if base_grid.contains(&endpoint) {
                base_grid.grid.set(endpoint.x, endpoint.y, false);
            }
        }
        base_grid.generate_components();
        base_grid
    }
    fn get(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y)
    }
    /// Updates a position on the grid. Opening a cell joins it to the components of its open
    /// neighbours; adding a wall may split a component, so the components are flagged as dirty.
    fn set(&mut self, x: i32, y: i32, blocked: bool) {
        if self.grid.get(x, y) == blocked {
            return;
        }
        self.grid.set(x, y, blocked);
        if blocked {
            self.components_dirty = true;
        } else {
            let p_ix = self.compute_ix(x, y);
            for n in self.passable_neighbours(&Point::new(x, y)) {
                self.components.union(p_ix, self.get_ix_point(&n));
            }
        }
    }
    fn width(&self) -> usize {
        self.grid.width
    }
    fn height(&self) -> usize {
        self.grid.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_matches_constants() {
        let pathing_grid = PathingGrid::default();
        assert_eq!(pathing_grid.width(), GRID_SIZE);
        assert_eq!(pathing_grid.height(), GRID_SIZE);
        assert_eq!(pathing_grid.start(), cell(10, 5));
        assert_eq!(pathing_grid.finish(), cell(10, 15));
        assert_eq!(
            PathingGrid::default_endpoints(GRID_SIZE, GRID_SIZE),
            (pathing_grid.start(), pathing_grid.finish())
        );
        assert_eq!(pathing_grid.passable_count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn new_keeps_endpoints_open() {
        let pathing_grid = PathingGrid::new(8, 4, true);
        assert!(pathing_grid.can_move_to(&pathing_grid.start()));
        assert!(pathing_grid.can_move_to(&pathing_grid.finish()));
        assert_eq!(pathing_grid.passable_count(), 2);
    }

    #[test]
    fn neighbourhood_order_and_bounds() {
        let pathing_grid = PathingGrid::new(3, 3, false);
        let centre = pathing_grid.neighborhood_points(&cell(1, 1));
        assert_eq!(
            centre.as_slice(),
            &[cell(0, 1), cell(2, 1), cell(1, 0), cell(1, 2)]
        );
        let corner = pathing_grid.neighborhood_points(&cell(0, 0));
        assert_eq!(corner.as_slice(), &[cell(1, 0), cell(0, 1)]);
    }

    #[test]
    fn cells_are_row_major() {
        let pathing_grid = PathingGrid::new(2, 2, false);
        let cells = pathing_grid.cells().collect::<Vec<_>>();
        assert_eq!(cells, vec![cell(0, 0), cell(0, 1), cell(1, 0), cell(1, 1)]);
    }

    #[test]
    fn toggle_wall_skips_endpoints() {
        let mut pathing_grid = PathingGrid::default();
        assert_eq!(pathing_grid.toggle_wall(cell(0, 0)), Ok(true));
        assert!(pathing_grid.is_blocked(&cell(0, 0)));
        assert_eq!(pathing_grid.toggle_wall(cell(0, 0)), Ok(false));
        assert!(!pathing_grid.is_blocked(&cell(0, 0)));
        let start = pathing_grid.start();
        assert_eq!(pathing_grid.toggle_wall(start), Ok(false));
        assert!(!pathing_grid.is_blocked(&start));
        assert_eq!(
            pathing_grid.toggle_wall(cell(20, 0)),
            Err(GridError::OutOfBounds(cell(20, 0)))
        );
    }

    #[test]
    fn moving_markers_clears_walls() {
        let mut pathing_grid = PathingGrid::default();
        pathing_grid.toggle_wall(cell(2, 2)).unwrap();
        pathing_grid.set_start(cell(2, 2)).unwrap();
        assert_eq!(pathing_grid.start(), cell(2, 2));
        assert!(!pathing_grid.is_blocked(&cell(2, 2)));
        pathing_grid.set_finish(cell(2, 2)).unwrap();
        assert_eq!(pathing_grid.finish(), pathing_grid.start());
        assert_eq!(
            pathing_grid.set_finish(cell(-1, 2)),
            Err(GridError::OutOfBounds(cell(-1, 2)))
        );
    }

    #[test]
    fn clear_restores_board() {
        let mut pathing_grid = PathingGrid::default();
        pathing_grid.toggle_wall(cell(0, 0)).unwrap();
        pathing_grid.set_start(cell(1, 1)).unwrap();
        pathing_grid.clear();
        assert_eq!(pathing_grid.start(), cell(10, 5));
        assert_eq!(pathing_grid.finish(), cell(10, 15));
        assert!(!pathing_grid.is_blocked(&cell(0, 0)));
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |S#F|
        // |.#.|
        let mut pathing_grid: PathingGrid = "S#F\n.#.".parse().unwrap();
        let a = pathing_grid.get_component(&cell(0, 0));
        assert_eq!(a, pathing_grid.get_component(&cell(1, 0)));
        assert_ne!(a, pathing_grid.get_component(&cell(0, 2)));
        assert_eq!(pathing_grid.get_component(&cell(5, 5)), None);
        assert!(pathing_grid.unreachable(&cell(0, 0), &cell(0, 2)));
        assert!(pathing_grid.reachable(&cell(0, 2), &cell(1, 2)));
    }

    #[test]
    fn components_follow_edits() {
        let mut pathing_grid: PathingGrid = "S.F".parse().unwrap();
        let (start, finish) = (pathing_grid.start(), pathing_grid.finish());
        assert!(pathing_grid.reachable(&start, &finish));
        pathing_grid.toggle_wall(cell(0, 1)).unwrap();
        assert!(pathing_grid.components_dirty());
        assert!(pathing_grid.unreachable(&start, &finish));
        assert!(!pathing_grid.components_dirty());
        pathing_grid.toggle_wall(cell(0, 1)).unwrap();
        assert!(!pathing_grid.components_dirty());
        assert!(pathing_grid.reachable(&start, &finish));
    }

    #[test]
    fn walls_are_never_reachable() {
        let mut pathing_grid: PathingGrid = "S#F".parse().unwrap();
        assert!(pathing_grid.unreachable(&cell(0, 1), &cell(0, 1)));
        assert!(pathing_grid.reachable(&cell(0, 0), &cell(0, 0)));
    }

    #[test]
    fn text_round_trip() {
        let text = "S..#\n.#..\n...F\n";
        let pathing_grid: PathingGrid = text.parse().unwrap();
        assert_eq!(pathing_grid.width(), 4);
        assert_eq!(pathing_grid.height(), 3);
        assert_eq!(pathing_grid.start(), cell(0, 0));
        assert_eq!(pathing_grid.finish(), cell(2, 3));
        assert!(pathing_grid.is_blocked(&cell(1, 1)));
        assert_eq!(pathing_grid.to_string(), text);
    }

    #[test]
    fn shared_marker_round_trip() {
        let mut pathing_grid: PathingGrid = "S.F".parse().unwrap();
        pathing_grid.set_finish(cell(0, 1)).unwrap();
        pathing_grid.set_start(cell(0, 1)).unwrap();
        assert_eq!(pathing_grid.to_string(), ".B.\n");
        let parsed: PathingGrid = pathing_grid.to_string().parse().unwrap();
        assert_eq!(parsed.start(), cell(0, 1));
        assert_eq!(parsed.finish(), cell(0, 1));
        assert_eq!(
            "SB.".parse::<PathingGrid>().unwrap_err(),
            GridError::DuplicateStart(cell(0, 1))
        );
    }

    #[test]
    fn blocked_marker_round_trip() {
        let mut pathing_grid: PathingGrid = "S.F".parse().unwrap();
        pathing_grid.set(2, 0, true);
        assert_eq!(pathing_grid.to_string(), "S.f\n");
        let mut parsed: PathingGrid = pathing_grid.to_string().parse().unwrap();
        assert_eq!(parsed.finish(), cell(0, 2));
        assert!(parsed.is_blocked(&cell(0, 2)));
        assert!(parsed.unreachable(&cell(0, 0), &cell(0, 2)));

        let shared: PathingGrid = "..b".parse().unwrap();
        assert_eq!(shared.start(), shared.finish());
        assert!(shared.is_blocked(&cell(0, 2)));
        assert_eq!(shared.to_string(), "..b\n");
    }

    #[test]
    fn toggle_on_blocked_endpoint_reports_wall() {
        let mut pathing_grid: PathingGrid = "S.F".parse().unwrap();
        pathing_grid.set(2, 0, true);
        assert_eq!(pathing_grid.toggle_wall(cell(0, 2)), Ok(true));
        assert!(pathing_grid.is_blocked(&cell(0, 2)));
        assert_eq!(pathing_grid.toggle_wall(cell(0, 0)), Ok(false));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<PathingGrid>().unwrap_err(), GridError::Empty);
        assert_eq!(
            "S..\n.F".parse::<PathingGrid>().unwrap_err(),
            GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            "S.x\n..F".parse::<PathingGrid>().unwrap_err(),
            GridError::UnknownTile {
                tile: 'x',
                row: 0,
                col: 2
            }
        );
        assert_eq!(
            "...\n..F".parse::<PathingGrid>().unwrap_err(),
            GridError::MissingStart
        );
        assert_eq!(
            "S..\n...".parse::<PathingGrid>().unwrap_err(),
            GridError::MissingFinish
        );
        assert_eq!(
            "S.S\n..F".parse::<PathingGrid>().unwrap_err(),
            GridError::DuplicateStart(cell(0, 2))
        );
        assert_eq!(
            "S.F\n..F".parse::<PathingGrid>().unwrap_err(),
            GridError::DuplicateFinish(cell(1, 2))
        );
    }
}
