//! Tabular Q-learning for finding a goal cell inside a maze
//!
//! The agent learns one Q-value per (cell, action) pair by running episodes
//! from random start cells, then follows the greedy policy to produce a path.
//!
//! ## Usage Example
//!
//! ```no_run
//! use labyrinth::q_learning::{NoProgress, QLearningAgent, TrainingConfig};
//! use labyrinth::{generate_maze, Cell, Grid, MazeRng};
//!
//! let mut rng = MazeRng::seeded(7);
//! let mut grid = Grid::new(5, 5)?;
//! generate_maze(&mut grid, &mut rng);
//!
//! let mut agent = QLearningAgent::new(TrainingConfig::fast());
//! agent.init(&grid, Cell::new(4, 4))?;
//! agent.train(&mut rng, &mut NoProgress)?;
//! let path = agent.find_path(Cell::new(0, 0))?;
//! # Ok::<(), labyrinth::Error>(())
//! ```

pub mod agent;
pub mod q_table;

// Public re-exports
pub use agent::{
    AgentState, NoProgress, ProgressSink, QLearningAgent, TrainingConfig, TrainingHandle,
    PERCENT_BLOCKS,
};
pub use q_table::QTable;
