#![allow(dead_code)]

use labyrinth::{generate_maze, Cell, Grid, MazeRng};

/// Generate a seeded maze of the given size
pub fn generated_maze(rows: usize, cols: usize, seed: u64) -> Grid {
    let mut grid = Grid::new(rows, cols).expect("valid dimensions");
    let mut rng = MazeRng::seeded(seed);
    generate_maze(&mut grid, &mut rng);
    grid
}

/// 1×N grid with only the outer right and bottom edges walled
pub fn corridor(cols: usize) -> Grid {
    let mut grid = Grid::new(1, cols).expect("valid dimensions");
    for col in 0..cols {
        grid.set_bottom_wall(0, col, true);
    }
    grid.set_right_wall(0, cols - 1, true);
    grid
}

/// Count of open edges between 4-adjacent cell pairs
pub fn open_passages(grid: &Grid) -> usize {
    grid.cells()
        .map(|cell| {
            [Cell::new(cell.row, cell.col + 1), Cell::new(cell.row + 1, cell.col)]
                .into_iter()
                .filter(|&next| grid.can_go(cell, next))
                .count()
        })
        .sum()
}

/// Whether the right and bottom outer edges are fully walled
pub fn outer_edges_sealed(grid: &Grid) -> bool {
    let (rows, cols) = (grid.rows(), grid.cols());
    (0..rows).all(|row| grid.has_right_wall(row, cols - 1))
        && (0..cols).all(|col| grid.has_bottom_wall(rows - 1, col))
}

/// Draw a maze with `|` and `_` walls, marking path cells with `*`
pub fn render_maze(grid: &Grid, path: &[Cell]) -> String {
    let mut result = String::new();
    result.push_str(&" _".repeat(grid.cols()));
    result.push('\n');
    for row in 0..grid.rows() {
        result.push('|');
        for col in 0..grid.cols() {
            let cell = Cell::new(row as i32, col as i32);
            let floor = if path.contains(&cell) {
                '*'
            } else if grid.has_bottom_wall(row, col) {
                '_'
            } else {
                ' '
            };
            result.push(floor);
            result.push(if grid.has_right_wall(row, col) { '|' } else { ' ' });
        }
        result.push('\n');
    }
    result
}
