pub mod cave;
pub mod cell;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod pathfinding;
pub mod q_learning;
pub mod rng;
pub mod serializer;
pub mod wire;

pub use cave::{Cave, CaveRules};
pub use cell::{Action, Cell};
pub use config::Config;
pub use error::{Error, Result};
pub use generator::generate_maze;
pub use grid::{Grid, MAX_SIZE};
pub use pathfinding::{distance_matrix, format_path, solve_maze};
pub use q_learning::{AgentState, QLearningAgent, TrainingConfig};
pub use rng::MazeRng;
pub use serializer::Layout;
