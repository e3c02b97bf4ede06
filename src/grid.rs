use crate::cell::{Action, Cell};
use crate::error::{Error, Result};

/// Largest supported side length for a maze or cave
pub const MAX_SIZE: usize = 50;

// One word per row
const _: () = assert!(MAX_SIZE <= 64);

/// Wall storage for one maze
///
/// Each row is a single `u64` word; bit `j` of `verticals[i]` is the wall on
/// the right edge of cell (i, j), bit `j` of `horizontals[i]` the wall on its
/// bottom edge. Bits at or above `cols` are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    verticals: Vec<u64>,
    horizontals: Vec<u64>,
}

fn dimensions_valid(rows: usize, cols: usize) -> bool {
    (1..=MAX_SIZE).contains(&rows) && (1..=MAX_SIZE).contains(&cols)
}

fn row_mask(cols: usize) -> u64 {
    if cols >= 64 {
        u64::MAX
    } else {
        (1u64 << cols) - 1
    }
}

impl Grid {
    /// Create a grid with every wall open
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if !dimensions_valid(rows, cols) {
            return Err(Error::InvalidDimensions {
                rows: rows as i64,
                cols: cols as i64,
            });
        }
        Ok(Grid {
            rows,
            cols,
            verticals: vec![0; rows],
            horizontals: vec![0; rows],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Reconfigure dimensions in place.
    ///
    /// Walls inside the overlapping area are kept, the rest are cleared.
    /// Returns `false` and leaves the grid untouched on out-of-range input.
    pub fn set_rows_cols(&mut self, rows: usize, cols: usize) -> bool {
        if !dimensions_valid(rows, cols) {
            return false;
        }
        let mask = row_mask(cols);
        self.verticals.resize(rows, 0);
        self.horizontals.resize(rows, 0);
        for word in self.verticals.iter_mut().chain(self.horizontals.iter_mut()) {
            *word &= mask;
        }
        self.rows = rows;
        self.cols = cols;
        true
    }

    /// Read bit `pos` of a row word
    pub fn get_bit(word: u64, pos: usize) -> u8 {
        ((word >> pos) & 1) as u8
    }

    pub fn set_bit1(word: &mut u64, pos: usize) {
        *word |= 1u64 << pos;
    }

    pub fn set_bit0(word: &mut u64, pos: usize) {
        *word &= !(1u64 << pos);
    }

    pub fn verticals(&self) -> &[u64] {
        &self.verticals
    }

    pub fn horizontals(&self) -> &[u64] {
        &self.horizontals
    }

    /// Replace the whole vertical-wall matrix
    pub fn set_verticals(&mut self, verticals: Vec<u64>) -> Result<()> {
        self.check_matrix(&verticals)?;
        self.verticals = verticals;
        Ok(())
    }

    /// Replace the whole horizontal-wall matrix
    pub fn set_horizontals(&mut self, horizontals: Vec<u64>) -> Result<()> {
        self.check_matrix(&horizontals)?;
        self.horizontals = horizontals;
        Ok(())
    }

    fn check_matrix(&self, matrix: &[u64]) -> Result<()> {
        if matrix.len() != self.rows {
            return Err(Error::InvalidConfiguration {
                message: format!("expected {} rows of walls, got {}", self.rows, matrix.len()),
            });
        }
        let mask = row_mask(self.cols);
        if let Some(word) = matrix.iter().find(|&&word| word & !mask != 0) {
            return Err(Error::InvalidWireValue {
                value: word.to_string(),
                message: format!("has bits beyond column {}", self.cols - 1),
            });
        }
        Ok(())
    }

    /// Wall on the right edge of (row, col)
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`. Use [`Grid::can_go`] for unchecked coordinates.
    pub fn has_right_wall(&self, row: usize, col: usize) -> bool {
        Self::get_bit(self.verticals[row], col) == 1
    }

    /// Wall on the bottom edge of (row, col)
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    pub fn has_bottom_wall(&self, row: usize, col: usize) -> bool {
        Self::get_bit(self.horizontals[row], col) == 1
    }

    /// Panics if `row >= rows`; `col` must be below `cols`
    pub fn set_right_wall(&mut self, row: usize, col: usize, wall: bool) {
        debug_assert!(col < self.cols, "column {} outside width {}", col, self.cols);
        if wall {
            Self::set_bit1(&mut self.verticals[row], col);
        } else {
            Self::set_bit0(&mut self.verticals[row], col);
        }
    }

    /// Panics if `row >= rows`; `col` must be below `cols`
    pub fn set_bottom_wall(&mut self, row: usize, col: usize, wall: bool) {
        debug_assert!(col < self.cols, "column {} outside width {}", col, self.cols);
        if wall {
            Self::set_bit1(&mut self.horizontals[row], col);
        } else {
            Self::set_bit0(&mut self.horizontals[row], col);
        }
    }

    /// Check that a point lies inside the current dimensions
    pub fn valid_point(&self, point: Cell) -> bool {
        point.row >= 0
            && point.col >= 0
            && (point.row as usize) < self.rows
            && (point.col as usize) < self.cols
    }

    /// True iff `from` and `to` are 4-adjacent and no wall separates them
    pub fn can_go(&self, from: Cell, to: Cell) -> bool {
        if !self.valid_point(from) || !self.valid_point(to) {
            return false;
        }
        let (fr, fc) = (from.row as usize, from.col as usize);
        let (tr, tc) = (to.row as usize, to.col as usize);
        if fr == tr && fc == tc + 1 {
            // left
            !self.has_right_wall(tr, tc)
        } else if fr == tr && fc + 1 == tc {
            // right
            !self.has_right_wall(fr, fc)
        } else if fc == tc && fr + 1 == tr {
            // down
            !self.has_bottom_wall(fr, fc)
        } else if fc == tc && fr == tr + 1 {
            // up
            !self.has_bottom_wall(tr, tc)
        } else {
            false
        }
    }

    /// Cells reachable from `cell` in one legal move, in action order
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Action::ALL
            .into_iter()
            .map(move |action| cell.step(action))
            .filter(move |&next| self.can_go(cell, next))
    }

    /// Iterate every cell, row-major
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows * cols).map(move |id| Cell::new((id / cols) as i32, (id % cols) as i32))
    }
}
