mod common;

use common::{generated_maze, open_passages, outer_edges_sealed, render_maze};
use labyrinth::{distance_matrix, solve_maze, Cell, MAX_SIZE};

#[test]
fn test_every_size_is_a_perfect_maze() {
    for rows in 1..=MAX_SIZE {
        for cols in 1..=MAX_SIZE {
            let grid = generated_maze(rows, cols, (rows * 100 + cols) as u64);

            assert_eq!(
                open_passages(&grid),
                rows * cols - 1,
                "{}x{} maze is not a spanning tree",
                rows,
                cols
            );
            assert!(outer_edges_sealed(&grid), "{}x{} outer edge open", rows, cols);

            let reached: usize = distance_matrix(&grid, Cell::new(0, 0)).iter().map(Vec::len).sum();
            assert_eq!(reached, rows * cols, "{}x{} maze is disconnected", rows, cols);
        }
    }
}

#[test]
fn test_single_row_has_no_inner_vertical_walls() {
    for cols in 1..=MAX_SIZE {
        let grid = generated_maze(1, cols, cols as u64);
        for col in 0..cols - 1 {
            assert!(!grid.has_right_wall(0, col), "1x{} wall at column {}", cols, col);
        }
        assert!(grid.has_right_wall(0, cols - 1));
    }
}

#[test]
fn test_single_column_has_no_inner_horizontal_walls() {
    for rows in 1..=MAX_SIZE {
        let grid = generated_maze(rows, 1, rows as u64);
        for row in 0..rows - 1 {
            assert!(!grid.has_bottom_wall(row, 0), "{}x1 wall at row {}", rows, row);
        }
        assert!(grid.has_bottom_wall(rows - 1, 0));
    }
}

#[test]
fn test_corners_are_mutually_reachable() {
    println!("\n=== Corner to corner in a 12x20 maze ===");

    let grid = generated_maze(12, 20, 2024);
    let start = Cell::new(0, 0);
    let end = Cell::new(11, 19);
    let path = solve_maze(&grid, start, end);
    println!("{}", render_maze(&grid, &path));

    assert_eq!(path.first(), Some(&end));
    assert_eq!(path.last(), Some(&start));
    for pair in path.windows(2) {
        assert!(grid.can_go(pair[0], pair[1]), "{} -> {} crosses a wall", pair[0], pair[1]);
    }

    let back = solve_maze(&grid, end, start);
    assert_eq!(back.len(), path.len());
}

#[test]
fn test_regenerating_replaces_walls() {
    let mut grid = generated_maze(8, 8, 1);
    let mut rng = labyrinth::MazeRng::seeded(2);
    labyrinth::generate_maze(&mut grid, &mut rng);
    assert_eq!(open_passages(&grid), 63);
}

#[test]
fn test_seeded_generation_repeats() {
    assert_eq!(generated_maze(15, 9, 77), generated_maze(15, 9, 77));
}
