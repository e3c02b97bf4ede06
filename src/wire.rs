//! JSON messages exchanged with the maze web service
//!
//! Wall rows travel as decimal strings rather than JSON numbers so that
//! 64-bit words survive clients with 53-bit integers.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::generator::generate_maze;
use crate::grid::{Grid, MAX_SIZE};
use crate::pathfinding::solve_maze;
use crate::rng::MazeRng;

/// Both wall matrices, one decimal string per row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallMatrices {
    pub verticals: Vec<String>,
    pub horizontals: Vec<String>,
}

impl WallMatrices {
    pub fn from_grid(grid: &Grid) -> Self {
        let encode = |matrix: &[u64]| matrix.iter().map(u64::to_string).collect();
        WallMatrices {
            verticals: encode(grid.verticals()),
            horizontals: encode(grid.horizontals()),
        }
    }

    /// Generate response body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a grid of the given size; extra rows in the message are ignored
    pub fn to_grid(&self, rows: usize, cols: usize) -> Result<Grid> {
        let mut grid = Grid::new(rows, cols)?;
        grid.set_verticals(decode_rows(&self.verticals, rows)?)?;
        grid.set_horizontals(decode_rows(&self.horizontals, rows)?)?;
        Ok(grid)
    }
}

fn decode_rows(values: &[String], rows: usize) -> Result<Vec<u64>> {
    if values.len() < rows {
        return Err(Error::InvalidWireValue {
            value: format!("{} rows", values.len()),
            message: format!("expected at least {}", rows),
        });
    }
    values[..rows]
        .iter()
        .map(|value| {
            value.parse::<u64>().map_err(|e| Error::InvalidWireValue {
                value: value.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn checked_dimensions(rows: i64, cols: i64) -> Result<(usize, usize)> {
    let max = MAX_SIZE as i64;
    if !(1..=max).contains(&rows) || !(1..=max).contains(&cols) {
        return Err(Error::InvalidDimensions { rows, cols });
    }
    Ok((rows as usize, cols as usize))
}

/// `{rows, cols}` body asking for a fresh maze
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub rows: i64,
    pub cols: i64,
}

impl GenerateRequest {
    pub fn handle(&self, rng: &mut MazeRng) -> Result<WallMatrices> {
        let (rows, cols) = checked_dimensions(self.rows, self.cols)?;
        let mut grid = Grid::new(rows, cols)?;
        generate_maze(&mut grid, rng);
        Ok(WallMatrices::from_grid(&grid))
    }
}

/// Body asking for the shortest path through a client-supplied maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRequest {
    pub rows: i64,
    pub cols: i64,
    pub start: [i32; 2],
    pub end: [i32; 2],
    #[serde(flatten)]
    pub walls: WallMatrices,
}

/// Path from start to end as `[row, col]` pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResponse {
    pub pass: Vec<[i32; 2]>,
}

impl PathRequest {
    /// Solve the request; `Ok(None)` when the end is unreachable
    pub fn handle(&self) -> Result<Option<PathResponse>> {
        let (rows, cols) = checked_dimensions(self.rows, self.cols)?;
        let grid = self.walls.to_grid(rows, cols)?;
        let (start, end) = (Cell::from(self.start), Cell::from(self.end));
        for point in [start, end] {
            if !grid.valid_point(point) {
                return Err(Error::InvalidCell {
                    row: point.row,
                    col: point.col,
                });
            }
        }

        let path = solve_maze(&grid, start, end);
        if path.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathResponse {
            pass: path.into_iter().rev().map(<[i32; 2]>::from).collect(),
        }))
    }
}
