//! Q-learning agent that learns to reach a goal cell inside a maze
//!
//! The agent borrows the grid for its whole lifetime, so training on a worker
//! thread only needs a scoped thread and a shared `&Grid`. Cancellation and the
//! "training in progress" flag live in a [`TrainingHandle`] that can be cloned
//! out before the agent is moved onto the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::{
    cell::{Action, Cell},
    error::{Error, Result},
    grid::Grid,
    q_learning::q_table::QTable,
    rng::MazeRng,
};

/// Number of progress blocks in a full training run
pub const PERCENT_BLOCKS: usize = 100;

/// Training schedule and learning parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub episodes_per_percent: usize,
    pub max_steps_per_episode: usize,
    /// Reward for stepping onto the goal
    pub reward: f64,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
}

impl TrainingConfig {
    /// Full schedule: 100 000 episodes in total
    pub fn production() -> Self {
        Self {
            episodes_per_percent: 1000,
            max_steps_per_episode: 100_000,
            reward: 35_500.0,
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
        }
    }

    /// Short schedule for tests and small mazes
    pub fn fast() -> Self {
        Self {
            episodes_per_percent: 100,
            max_steps_per_episode: 100,
            reward: 100.0,
            ..Self::production()
        }
    }

    /// Reward for every step that does not reach the goal
    pub fn step_reward(&self) -> f64 {
        self.reward / 7.0 / self.max_steps_per_episode as f64
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Lifecycle of a training run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Training,
    /// Cancelled through a [`TrainingHandle`]
    Stopped,
    /// Every percent block ran to completion
    Converged,
}

#[derive(Debug, Default)]
struct Flags {
    stop_requested: AtomicBool,
    training: AtomicBool,
}

/// Cloneable handle for cancelling training from another thread
#[derive(Debug, Clone, Default)]
pub struct TrainingHandle {
    flags: Arc<Flags>,
}

impl TrainingHandle {
    /// Ask the agent to stop at the next episode boundary
    pub fn stop(&self) {
        info!("Training stop requested");
        self.flags.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.flags.stop_requested.load(Ordering::SeqCst)
    }

    pub fn is_training(&self) -> bool {
        self.flags.training.load(Ordering::SeqCst)
    }
}

/// Receiver of training progress
pub trait ProgressSink: Send {
    /// Called at the start of each percent block with its index (0..100)
    fn on_progress(&mut self, percent: usize);

    /// Called once after a run completes all blocks
    fn on_finished(&mut self) {}
}

/// Sink that discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _percent: usize) {}
}

impl<F: FnMut(usize) + Send> ProgressSink for F {
    fn on_progress(&mut self, percent: usize) {
        self(percent)
    }
}

/// Tabular Q-learning agent for one grid and goal
#[derive(Debug)]
pub struct QLearningAgent<'a> {
    grid: Option<&'a Grid>,
    goal: Cell,
    q_table: QTable,
    config: TrainingConfig,
    state: AgentState,
    handle: TrainingHandle,
}

impl<'a> QLearningAgent<'a> {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            grid: None,
            goal: Cell::default(),
            q_table: QTable::new(0, 0, config.learning_rate, config.discount_factor),
            config,
            state: AgentState::Idle,
            handle: TrainingHandle::default(),
        }
    }

    /// Bind the agent to a grid and goal, zero the table and clear any stop request
    pub fn init(&mut self, grid: &'a Grid, goal: Cell) -> Result<()> {
        if !grid.valid_point(goal) {
            return Err(Error::InvalidCell {
                row: goal.row,
                col: goal.col,
            });
        }
        self.grid = Some(grid);
        self.goal = goal;
        self.q_table = QTable::new(
            grid.rows(),
            grid.cols(),
            self.config.learning_rate,
            self.config.discount_factor,
        );
        self.handle.flags.stop_requested.store(false, Ordering::SeqCst);
        self.state = AgentState::Idle;
        debug!("Agent bound to {}x{} grid, goal {}", grid.rows(), grid.cols(), goal);
        Ok(())
    }

    fn grid(&self) -> Result<&'a Grid> {
        self.grid.ok_or(Error::AgentNotInitialized)
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_training(&self) -> bool {
        self.handle.is_training()
    }

    pub fn handle(&self) -> TrainingHandle {
        self.handle.clone()
    }

    fn legal_actions(grid: &Grid, current: Cell) -> impl Iterator<Item = Action> + '_ {
        Action::ALL
            .into_iter()
            .filter(move |&action| grid.can_go(current, current.step(action)))
    }

    /// ε-greedy action selection
    ///
    /// Exploration draws up to four random actions looking for a legal one;
    /// if none is found the agent stays put and the last draw is reported.
    /// Exploitation returns `(None, current)` when no move is legal.
    pub fn choose_action(&self, current: Cell, rng: &mut MazeRng) -> Result<(Option<Action>, Cell)> {
        let grid = self.grid()?;
        if rng.real() < self.config.epsilon {
            let mut action = Action::Up;
            for _ in 0..Action::COUNT {
                action = Action::ALL[rng.index(Action::COUNT)];
                let next = current.step(action);
                if grid.can_go(current, next) {
                    return Ok((Some(action), next));
                }
            }
            Ok((Some(action), current))
        } else {
            let action = self
                .q_table
                .greedy_action(current, Self::legal_actions(grid, current));
            let next = action.map_or(current, |action| current.step(action));
            Ok((action, next))
        }
    }

    /// Apply one TD update; both cells must lie inside the bound grid
    pub fn update(&mut self, current: Cell, action: Action, next: Cell, reward: f64) -> Result<()> {
        let grid = self.grid()?;
        for cell in [current, next] {
            if !grid.valid_point(cell) {
                return Err(Error::InvalidCell {
                    row: cell.row,
                    col: cell.col,
                });
            }
        }
        self.q_table.q_learning_update(current, action, reward, next);
        Ok(())
    }

    /// Run the full training schedule
    ///
    /// Blocks until every percent block finished (`Converged`) or a stop was
    /// requested (`Stopped`). Progress is reported at the start of each block.
    pub fn train(&mut self, rng: &mut MazeRng, sink: &mut dyn ProgressSink) -> Result<AgentState> {
        let grid = self.grid()?;
        let config = self.config;
        let step_reward = config.step_reward();
        let started = Instant::now();

        info!(
            "Training on {}x{} grid towards {} ({} episodes per percent, {} max steps)",
            grid.rows(),
            grid.cols(),
            self.goal,
            config.episodes_per_percent,
            config.max_steps_per_episode
        );
        self.state = AgentState::Training;
        self.handle.flags.training.store(true, Ordering::SeqCst);

        for percent in 0..PERCENT_BLOCKS {
            sink.on_progress(percent);
            for _ in 0..config.episodes_per_percent {
                if self.handle.is_stop_requested() {
                    self.handle.flags.training.store(false, Ordering::SeqCst);
                    self.state = AgentState::Stopped;
                    info!("Training stopped at {}% after {:.2?}", percent, started.elapsed());
                    return Ok(self.state);
                }
                self.run_episode(grid, rng, step_reward)?;
            }
        }

        self.handle.flags.training.store(false, Ordering::SeqCst);
        self.state = AgentState::Converged;
        info!("Training finished in {:.2?}", started.elapsed());
        sink.on_finished();
        Ok(self.state)
    }

    fn run_episode(&mut self, grid: &Grid, rng: &mut MazeRng, step_reward: f64) -> Result<()> {
        let mut current = Cell::new(rng.index(grid.rows()) as i32, rng.index(grid.cols()) as i32);
        let mut steps = 0;
        while current != self.goal && steps < self.config.max_steps_per_episode {
            let (action, next) = self.choose_action(current, rng)?;
            if let Some(action) = action {
                let reward = if next == self.goal {
                    self.config.reward
                } else {
                    step_reward
                };
                self.update(current, action, next, reward)?;
            }
            steps += 1;
            current = next;
        }
        Ok(())
    }

    /// Greedy rollout from `start`
    ///
    /// Returns the visited cells, `start` first, when the goal is reached within
    /// `rows × cols` cells; otherwise an empty vector.
    pub fn find_path(&self, start: Cell) -> Result<Vec<Cell>> {
        let grid = self.grid()?;
        if !grid.valid_point(start) {
            return Err(Error::InvalidCell {
                row: start.row,
                col: start.col,
            });
        }

        let max_cells = grid.rows() * grid.cols();
        let mut path = vec![start];
        let mut current = start;
        while current != self.goal && path.len() < max_cells {
            current = self
                .q_table
                .greedy_action(current, Self::legal_actions(grid, current))
                .map_or(current, |action| current.step(action));
            path.push(current);
        }

        if current != self.goal {
            debug!("Greedy rollout from {} did not reach {}", start, self.goal);
            path.clear();
        }
        Ok(path)
    }

    /// Per-cell maximum Q-value as a fixed-width table, one line per grid row
    pub fn q_values_to_string(&self) -> Result<String> {
        let grid = self.grid()?;
        let mut out = String::new();
        for cell in grid.cells() {
            out.push_str(&format!("{:>10.3} ", self.q_table.max_q(cell)));
            if cell.col as usize + 1 == grid.cols() {
                out.push('\n');
            }
        }
        Ok(out)
    }
}
