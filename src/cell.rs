use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A position on the grid, addressed as (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// Cell reached by taking `action` from here (no bounds or wall check)
    pub fn step(self, action: Action) -> Cell {
        self + action.delta()
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, other: Cell) -> Cell {
        Cell::new(self.row + other.row, self.col + other.col)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Cell::new(row, col)
    }
}

impl From<[i32; 2]> for Cell {
    fn from([row, col]: [i32; 2]) -> Self {
        Cell::new(row, col)
    }
}

impl From<Cell> for [i32; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The four moves available inside a maze
///
/// The discriminant order is the action index used by the Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    pub const COUNT: usize = 4;
    pub const ALL: [Action; Action::COUNT] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Coordinate delta applied by this action
    pub fn delta(self) -> Cell {
        match self {
            Action::Up => Cell::new(-1, 0),
            Action::Down => Cell::new(1, 0),
            Action::Left => Cell::new(0, -1),
            Action::Right => Cell::new(0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_applies_delta() {
        let cell = Cell::new(2, 3);
        assert_eq!(cell + Cell::new(-1, 0), Cell::new(1, 3));
        assert_eq!(cell.step(Action::Right), Cell::new(2, 4));
        assert_eq!(cell.step(Action::Up).step(Action::Down), cell);
    }

    #[test]
    fn action_indices_follow_table_order() {
        for (i, action) in Action::ALL.into_iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }
}
