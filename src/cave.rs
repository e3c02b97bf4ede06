//! Cave generation with a birth/death cellular automaton
//!
//! Cells live in two bit buffers, `current` and `next`, one `u64` word per
//! row. A step reads only `current`, writes only `next`, then swaps them.
//! Cells beyond the grid edge count as alive, which seals the border.

use log::debug;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::rng::MazeRng;

/// Highest neighbour-count threshold accepted for birth or death
pub const MAX_THRESHOLD: u8 = 7;

/// Birth/death thresholds for one automaton run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaveRules {
    /// A dead cell is born when its live-neighbour count exceeds this
    pub birth: u8,
    /// A live cell survives when its live-neighbour count reaches this
    pub death: u8,
}

impl CaveRules {
    pub fn new(birth: u8, death: u8) -> Result<Self> {
        let rules = CaveRules { birth, death };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<()> {
        if self.birth > MAX_THRESHOLD || self.death > MAX_THRESHOLD {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "birth {} and death {} must both be in 0..={}",
                    self.birth, self.death, MAX_THRESHOLD
                ),
            });
        }
        Ok(())
    }
}

impl Default for CaveRules {
    fn default() -> Self {
        CaveRules { birth: 4, death: 3 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cave {
    rows: usize,
    cols: usize,
    current: Vec<u64>,
    next: Vec<u64>,
}

impl Cave {
    /// Create an all-dead cave
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        // Same bounds as a maze
        let grid = Grid::new(rows, cols)?;
        Ok(Self::from_grid(&grid))
    }

    /// Take the current generation from a grid's vertical matrix
    ///
    /// This is how caves are stored in the text format.
    pub fn from_grid(grid: &Grid) -> Self {
        Cave {
            rows: grid.rows(),
            cols: grid.cols(),
            current: grid.verticals().to_vec(),
            next: vec![0; grid.rows()],
        }
    }

    /// Grid holding the current generation in its vertical matrix
    pub fn to_grid(&self) -> Result<Grid> {
        let mut grid = Grid::new(self.rows, self.cols)?;
        grid.set_verticals(self.current.clone())?;
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Current generation, one word per row
    pub fn cells(&self) -> &[u64] {
        &self.current
    }

    /// # Panics
    ///
    /// Panics if `row >= rows`.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        Grid::get_bit(self.current[row], col) == 1
    }

    /// Panics if `row >= rows`; `col` must be below `cols`
    pub fn set_alive(&mut self, row: usize, col: usize, alive: bool) {
        debug_assert!(col < self.cols, "column {} outside width {}", col, self.cols);
        if alive {
            Grid::set_bit1(&mut self.current[row], col);
        } else {
            Grid::set_bit0(&mut self.current[row], col);
        }
    }

    pub fn alive_count(&self) -> usize {
        self.current.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Seed every cell alive with probability `chance`
    pub fn generate(&mut self, chance: f64, rng: &mut MazeRng) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let alive = rng.real() < chance;
                self.set_alive(row, col, alive);
            }
        }
        debug!(
            "generated {}x{} cave, {} alive (chance {:.2})",
            self.rows,
            self.cols,
            self.alive_count(),
            chance
        );
    }

    /// Live cells in the Moore neighbourhood; outside the grid counts as alive
    fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut sum = 0;
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row as i64 + dr;
                let c = col as i64 + dc;
                let outside = r < 0 || c < 0 || r >= self.rows as i64 || c >= self.cols as i64;
                if outside || Grid::get_bit(self.current[r as usize], c as usize) == 1 {
                    sum += 1;
                }
            }
        }
        sum
    }

    /// Advance one generation.
    ///
    /// Returns `true` when the new generation equals the previous one.
    pub fn step(&mut self, rules: CaveRules) -> bool {
        let mut stable = true;
        for row in 0..self.rows {
            let mut word = 0u64;
            for col in 0..self.cols {
                let sum = self.live_neighbors(row, col);
                let alive = if self.is_alive(row, col) {
                    sum >= rules.death
                } else {
                    sum > rules.birth
                };
                if alive {
                    Grid::set_bit1(&mut word, col);
                }
            }
            self.next[row] = word;
            stable = stable && self.next[row] == self.current[row];
        }
        std::mem::swap(&mut self.current, &mut self.next);
        stable
    }

    /// Step until a generation repeats or `max_generations` steps have run.
    ///
    /// Returns the number of steps taken when stability was reached.
    pub fn run_until_stable(&mut self, rules: CaveRules, max_generations: usize) -> Option<usize> {
        for generation in 1..=max_generations {
            if self.step(rules) {
                debug!("cave stable after {} generations", generation);
                return Some(generation);
            }
        }
        debug!("cave not stable after {} generations", max_generations);
        None
    }
}

impl From<&Grid> for Cave {
    fn from(grid: &Grid) -> Self {
        Cave::from_grid(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_pattern() -> Cave {
        let mut cave = Cave::new(3, 3).unwrap();
        for (r, c) in [(0, 0), (0, 2), (1, 1), (2, 0), (2, 2)] {
            cave.set_alive(r, c, true);
        }
        cave
    }

    #[test]
    fn border_counts_as_alive() {
        let cave = Cave::new(3, 3).unwrap();
        assert_eq!(cave.live_neighbors(0, 0), 5);
        assert_eq!(cave.live_neighbors(1, 1), 0);
        assert_eq!(cave.live_neighbors(0, 1), 3);

        let single = Cave::new(1, 1).unwrap();
        assert_eq!(single.live_neighbors(0, 0), 8);
    }

    #[test]
    fn neighbor_sum_excludes_self() {
        let cave = cross_pattern();
        assert_eq!(cave.live_neighbors(1, 1), 4);
        assert_eq!(cave.live_neighbors(0, 1), 6);
    }

    #[test]
    fn step_on_cross_pattern() {
        let mut cave = cross_pattern();
        assert!(!cave.step(CaveRules { birth: 3, death: 2 }));
        for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1), (2, 2)] {
            assert!(cave.is_alive(r, c), "({}, {}) should be alive", r, c);
        }
    }

    #[test]
    fn stable_when_nothing_changes() {
        let mut cave = Cave::new(4, 4).unwrap();
        cave.generate(1.0, &mut MazeRng::seeded(0));
        assert!(cave.step(CaveRules { birth: 4, death: 3 }));
        assert_eq!(cave.alive_count(), 16);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside width")]
    fn set_alive_rejects_column_beyond_width() {
        let mut cave = Cave::new(3, 3).unwrap();
        cave.set_alive(0, 3, true);
    }

    #[test]
    fn rules_reject_large_thresholds() {
        assert!(CaveRules::new(8, 3).is_err());
        assert!(CaveRules::new(3, 8).is_err());
        assert!(CaveRules::new(7, 0).is_ok());
    }

    #[test]
    fn grid_round_trip_keeps_current_generation() {
        let cave = cross_pattern();
        let grid = cave.to_grid().unwrap();
        assert_eq!(grid.verticals(), cave.cells());
        assert_eq!(Cave::from_grid(&grid).cells(), cave.cells());
    }
}
