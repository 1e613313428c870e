use grid_pathfinder::{cell, CellMark, FrontierSolver, PathingGrid, ScanSolver};
use grid_util::grid::ValueGrid;

// Reproduces the default visualizer board: a 20x20 grid with the start on the left of the middle
// row and the finish on the right. A wall is painted down column 10 with a single gap at row 3,
// so the path has to detour through the gap.
//
// In the output
// - # marks a wall
// - S and F mark the start and finish
// - o marks a visited cell
// - * marks a cell on the shortest path

fn main() {
    let mut pathing_grid = PathingGrid::default();
    for row in 0..pathing_grid.height() as i32 {
        if row != 3 {
            pathing_grid.toggle_wall(cell(row, 10)).unwrap();
        }
    }
    println!("{}", pathing_grid);

    let visualization = pathing_grid.visualize(&FrontierSolver).unwrap();
    println!("{}", visualization);
    println!(
        "Visited {} cells, path of {} cells",
        visualization.result().visited_order().len(),
        visualization.count(CellMark::Path)
    );

    let scan = pathing_grid.visualize(&ScanSolver).unwrap();
    assert_eq!(
        scan.result().visited_order(),
        visualization.result().visited_order()
    );

    pathing_grid.clear();
    let cleared = pathing_grid.visualize(&FrontierSolver).unwrap();
    println!("After clearing: path of {} cells", cleared.count(CellMark::Path));
}
