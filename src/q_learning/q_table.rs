//! Dense Q-table indexed by grid cell and action

use crate::cell::{Action, Cell};

/// Q-values for every (cell, action) pair of one grid
///
/// Stored row-major, one `[f64; 4]` per cell in action-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    cols: usize,
    q_values: Vec<[f64; Action::COUNT]>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zeroed table for a `rows × cols` grid
    pub fn new(rows: usize, cols: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            cols,
            q_values: vec![[0.0; Action::COUNT]; rows * cols],
            learning_rate,
            discount_factor,
        }
    }

    fn id(&self, cell: Cell) -> usize {
        cell.row as usize * self.cols + cell.col as usize
    }

    pub fn get(&self, cell: Cell, action: Action) -> f64 {
        self.q_values[self.id(cell)][action.index()]
    }

    pub fn set(&mut self, cell: Cell, action: Action, value: f64) {
        let id = self.id(cell);
        self.q_values[id][action.index()] = value;
    }

    /// Maximum Q-value over all four actions, legal or not
    pub fn max_q(&self, cell: Cell) -> f64 {
        self.q_values[self.id(cell)]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy choice among `candidates`; the first strictly greatest value wins ties
    pub fn greedy_action(&self, cell: Cell, candidates: impl IntoIterator<Item = Action>) -> Option<Action> {
        let mut best: Option<(Action, f64)> = None;
        for action in candidates {
            let q = self.get(cell, action);
            if best.map_or(true, |(_, max)| q > max) {
                best = Some((action, q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Q-learning update
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    pub fn q_learning_update(&mut self, cell: Cell, action: Action, reward: f64, next: Cell) {
        let current_q = self.get(cell, action);
        let target = reward + self.discount_factor * self.max_q(next);
        let new_q = (1.0 - self.learning_rate) * current_q + self.learning_rate * target;
        self.set(cell, action, new_q);
    }

    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_qtable_starts_zeroed() {
        let table = QTable::new(2, 3, 0.1, 0.95);
        assert_eq!(table.len(), 6);
        for action in Action::ALL {
            assert_eq!(table.get(Cell::new(1, 2), action), 0.0);
        }
    }

    #[test]
    fn test_max_q_covers_all_actions() {
        let mut table = QTable::new(1, 1, 0.1, 0.95);
        let cell = Cell::new(0, 0);
        table.set(cell, Action::Up, -2.0);
        table.set(cell, Action::Left, 1.5);
        assert_eq!(table.max_q(cell), 1.5);
    }

    #[test]
    fn test_greedy_action_first_wins_ties() {
        let mut table = QTable::new(1, 1, 0.1, 0.95);
        let cell = Cell::new(0, 0);
        table.set(cell, Action::Down, 1.0);
        table.set(cell, Action::Right, 1.0);
        assert_eq!(table.greedy_action(cell, Action::ALL), Some(Action::Down));
        assert_eq!(table.greedy_action(cell, [Action::Up, Action::Left]), Some(Action::Up));
        assert_eq!(table.greedy_action(cell, std::iter::empty()), None);
    }

    #[test]
    fn test_q_learning_update() {
        let mut table = QTable::new(1, 2, 0.1, 0.95);
        let (here, there) = (Cell::new(0, 0), Cell::new(0, 1));
        table.set(there, Action::Left, 2.0);
        table.set(here, Action::Right, 1.0);

        table.q_learning_update(here, Action::Right, 10.0, there);

        // 0.9 * 1.0 + 0.1 * (10.0 + 0.95 * 2.0)
        assert_relative_eq!(table.get(here, Action::Right), 2.09, epsilon = 1e-12);
    }
}
