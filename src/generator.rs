//! Perfect maze generation with Eller's algorithm
//!
//! The maze is built one row at a time. Each column carries a set label;
//! cells sharing a label are already connected, so a wall is forced between
//! them to avoid cycles, and every set must keep at least one passage down
//! into the next row so no region is cut off. The last row joins every
//! remaining set, which makes the passage graph a spanning tree.

use log::debug;

use crate::grid::Grid;
use crate::rng::MazeRng;

/// Per-column set labels for the row being built
struct RowSets {
    labels: Vec<usize>,
    next_label: usize,
}

impl RowSets {
    fn new(cols: usize) -> Self {
        RowSets {
            labels: (0..cols).collect(),
            next_label: cols,
        }
    }

    fn same(&self, a: usize, b: usize) -> bool {
        self.labels[a] == self.labels[b]
    }

    /// Relabel the set containing `from` into the set containing `into`
    fn merge(&mut self, into: usize, from: usize) {
        let target = self.labels[into];
        let changing = self.labels[from];
        for label in self.labels.iter_mut().filter(|label| **label == changing) {
            *label = target;
        }
    }

    fn fresh(&mut self, col: usize) {
        self.labels[col] = self.next_label;
        self.next_label += 1;
    }

    /// Distinct labels in column order of first appearance
    fn distinct(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for &label in &self.labels {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen
    }
}

/// Fill `grid` with a perfect maze, overwriting any existing walls
pub fn generate_maze(grid: &mut Grid, rng: &mut MazeRng) {
    let (rows, cols) = (grid.rows(), grid.cols());
    if rows == 0 || cols == 0 {
        return;
    }

    let mut sets = RowSets::new(cols);
    for row in 0..rows - 1 {
        make_vertical_walls(grid, &mut sets, row, rng);
        for col in 0..cols {
            grid.set_bottom_wall(row, col, rng.bit());
        }
        ensure_passage_down(grid, &sets, row, rng);
        for col in 0..cols {
            if grid.has_bottom_wall(row, col) {
                sets.fresh(col);
            }
        }
    }
    make_last_row(grid, &mut sets, rng);

    debug!("generated {}x{} maze", rows, cols);
}

fn make_vertical_walls(grid: &mut Grid, sets: &mut RowSets, row: usize, rng: &mut MazeRng) {
    let cols = grid.cols();
    for col in 0..cols - 1 {
        let wall = sets.same(col, col + 1) || rng.bit();
        grid.set_right_wall(row, col, wall);
        if !wall {
            sets.merge(col, col + 1);
        }
    }
    grid.set_right_wall(row, cols - 1, true);
}

/// Every set in this row needs at least one open bottom edge
fn ensure_passage_down(grid: &mut Grid, sets: &RowSets, row: usize, rng: &mut MazeRng) {
    for label in sets.distinct() {
        let members: Vec<usize> = (0..grid.cols())
            .filter(|&col| sets.labels[col] == label)
            .collect();
        let sealed = members.iter().all(|&col| grid.has_bottom_wall(row, col));
        if sealed {
            let chosen = members[rng.index(members.len())];
            grid.set_bottom_wall(row, chosen, false);
        }
    }
}

fn make_last_row(grid: &mut Grid, sets: &mut RowSets, rng: &mut MazeRng) {
    let (row, cols) = (grid.rows() - 1, grid.cols());
    make_vertical_walls(grid, sets, row, rng);
    // No row below to defer to: join every remaining pair of distinct sets.
    for col in 0..cols - 1 {
        if !sets.same(col, col + 1) {
            grid.set_right_wall(row, col, false);
            sets.merge(col, col + 1);
        }
        grid.set_bottom_wall(row, col, true);
    }
    grid.set_bottom_wall(row, cols - 1, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_sets_merge_relabels_whole_set() {
        let mut sets = RowSets::new(4);
        sets.merge(0, 1);
        sets.merge(2, 3);
        sets.merge(1, 2);
        assert!(sets.same(0, 3));
        assert_eq!(sets.distinct().len(), 1);
    }

    #[test]
    fn fresh_labels_are_unique() {
        let mut sets = RowSets::new(3);
        sets.merge(0, 1);
        sets.fresh(1);
        assert!(!sets.same(0, 1));
        assert!(!sets.same(1, 2));
        assert_eq!(sets.distinct().len(), 3);
    }

    #[test]
    fn single_cell_is_fully_walled() {
        let mut grid = Grid::new(1, 1).unwrap();
        generate_maze(&mut grid, &mut MazeRng::seeded(3));
        assert!(grid.has_right_wall(0, 0));
        assert!(grid.has_bottom_wall(0, 0));
    }

    #[test]
    fn outer_edges_are_sealed() {
        let mut grid = Grid::new(8, 6).unwrap();
        generate_maze(&mut grid, &mut MazeRng::seeded(11));
        for row in 0..8 {
            assert!(grid.has_right_wall(row, 5));
        }
        for col in 0..6 {
            assert!(grid.has_bottom_wall(7, col));
        }
    }
}
