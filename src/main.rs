use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use labyrinth::q_learning::{ProgressSink, PERCENT_BLOCKS};
use labyrinth::serializer::{self, Layout};
use labyrinth::wire::WallMatrices;
use labyrinth::{
    distance_matrix, format_path, generate_maze, solve_maze, Cave, CaveRules, Cell, Config, Grid,
    MazeRng, QLearningAgent, TrainingConfig,
};

#[derive(Parser)]
#[command(name = "labyrinth")]
#[command(version, about = "Perfect mazes, caves, shortest paths and Q-learning", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Seed for the random generator (overrides [random] seed)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a perfect maze
    Generate(GenerateArgs),

    /// Find the shortest path through a maze file
    Solve(SolveArgs),

    /// Generate or load a cave and evolve it
    Cave(CaveArgs),

    /// Train a Q-learning agent on a maze file
    Train(TrainArgs),
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    cols: Option<usize>,
    /// Write the maze here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Print the web service JSON encoding
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SolveArgs {
    #[arg(long, short)]
    input: PathBuf,
    #[arg(long, value_parser = parse_cell)]
    from: Cell,
    #[arg(long, value_parser = parse_cell)]
    to: Option<Cell>,
    /// Print breadth-first distance levels from --from instead of a path
    #[arg(long)]
    levels: bool,
}

#[derive(Args)]
struct CaveArgs {
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    cols: Option<usize>,
    /// Probability that a cell starts alive
    #[arg(long)]
    chance: Option<f64>,
    #[arg(long)]
    birth: Option<u8>,
    #[arg(long)]
    death: Option<u8>,
    /// Advance exactly this many generations instead of running until stable
    #[arg(long)]
    generations: Option<usize>,
    /// Start from a cave file instead of a random fill
    #[arg(long, short)]
    input: Option<PathBuf>,
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct TrainArgs {
    #[arg(long, short)]
    input: PathBuf,
    #[arg(long, value_parser = parse_cell)]
    goal: Cell,
    #[arg(long, value_parser = parse_cell)]
    from: Cell,
    /// Use the short training schedule
    #[arg(long)]
    fast: bool,
    /// Print the learned per-cell maximum Q-values
    #[arg(long)]
    q_values: bool,
}

/// Parse `row,col`
fn parse_cell(s: &str) -> Result<Cell, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected row,col but got '{}'", s))?;
    let row = row.trim().parse().map_err(|e| format!("bad row '{}': {}", row, e))?;
    let col = col.trim().parse().map_err(|e| format!("bad col '{}': {}", col, e))?;
    Ok(Cell::new(row, col))
}

/// Training progress rendered as a terminal bar
struct BarProgress(ProgressBar);

impl ProgressSink for BarProgress {
    fn on_progress(&mut self, percent: usize) {
        self.0.set_position(percent as u64);
    }

    fn on_finished(&mut self) {
        self.0.finish_with_message("done");
    }
}

fn create_training_progress() -> Result<ProgressBar> {
    let pb = ProgressBar::new(PERCENT_BLOCKS as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}% ({msg})")?
            .progress_chars("=>-"),
    );
    pb.set_message("training");
    Ok(pb)
}

fn run_generate(args: GenerateArgs, config: &Config, rng: &mut MazeRng) -> Result<()> {
    let rows = args.rows.unwrap_or(config.maze.rows);
    let cols = args.cols.unwrap_or(config.maze.cols);
    let mut grid = Grid::new(rows, cols)?;
    generate_maze(&mut grid, rng);

    if args.json {
        println!("{}", WallMatrices::from_grid(&grid).to_json()?);
    } else if let Some(output) = args.output {
        let written = serializer::save_file(&grid, &output, Layout::Maze)?;
        println!("Maze saved to {}", written.display());
    } else {
        print!("{}", serializer::to_string(&grid, Layout::Maze)?);
    }
    Ok(())
}

fn run_solve(args: SolveArgs) -> Result<()> {
    let grid = serializer::load_file(&args.input, Layout::Maze)
        .with_context(|| format!("loading maze from {}", args.input.display()))?;

    if args.levels {
        for (depth, level) in distance_matrix(&grid, args.from).iter().enumerate() {
            let cells: Vec<String> = level.iter().map(Cell::to_string).collect();
            println!("{:>3}: {}", depth, cells.join(" "));
        }
        return Ok(());
    }

    let to = args.to.ok_or_else(|| anyhow!("--to is required unless --levels is given"))?;
    let mut path = solve_maze(&grid, args.from, to);
    path.reverse();
    println!("{}", format_path(&path));
    Ok(())
}

fn run_cave(args: CaveArgs, config: &Config, rng: &mut MazeRng) -> Result<()> {
    let rules = CaveRules::new(
        args.birth.unwrap_or(config.cave.birth),
        args.death.unwrap_or(config.cave.death),
    )?;

    let mut cave = match &args.input {
        Some(input) => {
            let grid = serializer::load_file(input, Layout::Cave)
                .with_context(|| format!("loading cave from {}", input.display()))?;
            Cave::from(&grid)
        }
        None => {
            let mut cave = Cave::new(
                args.rows.unwrap_or(config.cave.rows),
                args.cols.unwrap_or(config.cave.cols),
            )?;
            cave.generate(args.chance.unwrap_or(config.cave.chance), rng);
            cave
        }
    };

    match args.generations {
        Some(generations) => {
            for generation in 0..generations {
                if cave.step(rules) {
                    info!("Cave stable after {} generations", generation + 1);
                    break;
                }
            }
        }
        None => match cave.run_until_stable(rules, config.cave.max_generations) {
            Some(generations) => info!("Cave stable after {} generations", generations),
            None => info!(
                "Cave still changing after {} generations",
                config.cave.max_generations
            ),
        },
    }

    let grid = cave.to_grid()?;
    match args.output {
        Some(output) => {
            let written = serializer::save_file(&grid, &output, Layout::Cave)?;
            println!("Cave saved to {}", written.display());
        }
        None => print!("{}", serializer::to_string(&grid, Layout::Cave)?),
    }
    Ok(())
}

fn run_train(args: TrainArgs, config: &Config, rng: &mut MazeRng) -> Result<()> {
    let grid = serializer::load_file(&args.input, Layout::Maze)
        .with_context(|| format!("loading maze from {}", args.input.display()))?;
    let training = if args.fast {
        TrainingConfig::fast()
    } else {
        config.training.resolve()
    };

    let mut agent = QLearningAgent::new(training);
    agent.init(&grid, args.goal)?;

    let mut sink = BarProgress(create_training_progress()?);
    let mut worker_rng = rng.fork();
    let state = std::thread::scope(|s| {
        s.spawn(|| agent.train(&mut worker_rng, &mut sink))
            .join()
            .map_err(|_| anyhow!("training worker panicked"))
    })??;
    info!("Agent finished in state {:?}", state);

    let path = agent.find_path(args.from)?;
    println!("{}", format_path(&path));
    if args.q_values {
        print!("{}", agent.q_values_to_string()?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config);
    let mut rng = MazeRng::from_seed(cli.seed.or(config.random.seed));
    if let Some(seed) = rng.seed() {
        info!("Using random seed {}", seed);
    }

    match cli.command {
        Commands::Generate(args) => run_generate(args, &config, &mut rng),
        Commands::Solve(args) => run_solve(args),
        Commands::Cave(args) => run_cave(args, &config, &mut rng),
        Commands::Train(args) => run_train(args, &config, &mut rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_arguments() {
        assert_eq!(parse_cell("2,3"), Ok(Cell::new(2, 3)));
        assert_eq!(parse_cell(" 0 , 4 "), Ok(Cell::new(0, 4)));
        assert!(parse_cell("2").is_err());
        assert!(parse_cell("a,1").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
