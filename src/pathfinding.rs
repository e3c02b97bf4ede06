use std::collections::VecDeque;

use log::{debug, trace};

use crate::cell::Cell;
use crate::grid::Grid;

/// Predecessor table for a breadth-first search, `None` marks unvisited cells
struct Predecessors {
    cols: usize,
    prev: Vec<Option<Cell>>,
}

impl Predecessors {
    fn new(grid: &Grid) -> Self {
        Predecessors {
            cols: grid.cols(),
            prev: vec![None; grid.rows() * grid.cols()],
        }
    }

    fn id(&self, cell: Cell) -> usize {
        cell.row as usize * self.cols + cell.col as usize
    }

    fn get(&self, cell: Cell) -> Option<Cell> {
        self.prev[self.id(cell)]
    }

    fn visit(&mut self, cell: Cell, from: Cell) -> bool {
        let id = self.id(cell);
        if self.prev[id].is_some() {
            return false;
        }
        self.prev[id] = Some(from);
        true
    }
}

/// Shortest path from `start` to `end` through open passages
///
/// The path is ordered end-to-start and includes both endpoints. An empty
/// vector means `end` is unreachable (or either endpoint is off the grid);
/// `start == end` yields a single cell.
pub fn solve_maze(grid: &Grid, start: Cell, end: Cell) -> Vec<Cell> {
    if !grid.valid_point(start) || !grid.valid_point(end) {
        debug!("[solve_maze] endpoint outside grid: {} -> {}", start, end);
        return Vec::new();
    }

    let mut prev = Predecessors::new(grid);
    let mut queue = VecDeque::from([start]);
    prev.visit(start, start);

    let mut found = false;
    while let Some(current) = queue.pop_front() {
        if current == end {
            found = true;
            break;
        }
        for next in grid.open_neighbors(current) {
            if prev.visit(next, current) {
                queue.push_back(next);
            }
        }
    }

    let mut path = Vec::new();
    if found {
        path.push(end);
        let mut cursor = end;
        while cursor != start {
            match prev.get(cursor) {
                Some(back) => {
                    path.push(back);
                    cursor = back;
                }
                None => break,
            }
        }
    }

    debug!(
        "[solve_maze] {} -> {}: {}",
        start,
        end,
        if found {
            format!("{} cells", path.len())
        } else {
            "no path".to_string()
        }
    );
    path
}

/// Breadth-first distance levels from `start`
///
/// Element `k` holds the cells at distance exactly `k`; the last element is
/// always the empty level where expansion stopped. An off-grid start yields
/// no levels at all.
pub fn distance_matrix(grid: &Grid, start: Cell) -> Vec<Vec<Cell>> {
    if !grid.valid_point(start) {
        return Vec::new();
    }

    let mut visited = vec![false; grid.rows() * grid.cols()];
    let id = |cell: Cell| cell.row as usize * grid.cols() + cell.col as usize;
    visited[id(start)] = true;

    let mut levels = vec![vec![start]];
    let mut depth = 0;
    while !levels[depth].is_empty() {
        let mut next_level = Vec::new();
        for &cell in &levels[depth] {
            for next in grid.open_neighbors(cell) {
                if !visited[id(next)] {
                    visited[id(next)] = true;
                    next_level.push(next);
                }
            }
        }
        depth += 1;
        trace!("[distance_matrix] level {}: {} cells", depth, next_level.len());
        levels.push(next_level);
    }
    levels
}

/// Format a path for display
pub fn format_path(path: &[Cell]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, cell) in path.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&cell.to_string());
    }
    result
}
