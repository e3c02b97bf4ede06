use serde::Deserialize;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::cave::CaveRules;
use crate::error::{Error, Result};
use crate::grid::MAX_SIZE;
use crate::q_learning::TrainingConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub cave: CaveConfig,
    #[serde(default)]
    pub training: TrainingSection,
    #[serde(default)]
    pub random: RandomConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MazeConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaveConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    #[serde(default = "default_chance")]
    pub chance: f64,
    #[serde(default = "default_birth")]
    pub birth: u8,
    #[serde(default = "default_death")]
    pub death: u8,
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingMode {
    #[default]
    Production,
    Fast,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TrainingSection {
    #[serde(default)]
    pub mode: TrainingMode,
    pub episodes_per_percent: Option<usize>,
    pub max_steps_per_episode: Option<usize>,
    pub reward: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

// Default values
fn default_rows() -> usize { 10 }
fn default_cols() -> usize { 10 }
fn default_chance() -> f64 { 0.5 }
fn default_birth() -> u8 { 4 }
fn default_death() -> u8 { 3 }
fn default_max_generations() -> usize { 1000 }

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            chance: default_chance(),
            birth: default_birth(),
            death: default_death(),
            max_generations: default_max_generations(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            cave: CaveConfig::default(),
            training: TrainingSection::default(),
            random: RandomConfig::default(),
        }
    }
}

impl CaveConfig {
    pub fn rules(&self) -> CaveRules {
        CaveRules {
            birth: self.birth,
            death: self.death,
        }
    }
}

impl TrainingSection {
    /// Schedule for the selected mode with any explicit overrides applied
    pub fn resolve(&self) -> TrainingConfig {
        let mut config = match self.mode {
            TrainingMode::Production => TrainingConfig::production(),
            TrainingMode::Fast => TrainingConfig::fast(),
        };
        if let Some(episodes) = self.episodes_per_percent {
            config.episodes_per_percent = episodes;
        }
        if let Some(steps) = self.max_steps_per_episode {
            config.max_steps_per_episode = steps;
        }
        if let Some(reward) = self.reward {
            config.reward = reward;
        }
        config
    }
}

fn check_size(section: &str, rows: usize, cols: usize) -> Result<()> {
    if !(1..=MAX_SIZE).contains(&rows) || !(1..=MAX_SIZE).contains(&cols) {
        return Err(Error::InvalidConfiguration {
            message: format!("[{}] size {}x{} must be within 1..={}", section, rows, cols, MAX_SIZE),
        });
    }
    Ok(())
}

impl Config {
    /// Load configuration from file, or use defaults if it is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_size("maze", self.maze.rows, self.maze.cols)?;
        check_size("cave", self.cave.rows, self.cave.cols)?;
        if !(0.0..=1.0).contains(&self.cave.chance) {
            return Err(Error::InvalidConfiguration {
                message: format!("[cave] chance {} must be within 0.0..=1.0", self.cave.chance),
            });
        }
        self.cave.rules().validate()?;
        let training = self.training.resolve();
        if training.episodes_per_percent == 0 || training.max_steps_per_episode == 0 {
            return Err(Error::InvalidConfiguration {
                message: "[training] episode and step counts must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cave.rules(), CaveRules::default());
        assert_eq!(config.random.seed, None);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = Config::from_toml_str(
            r#"
            [maze]
            rows = 20

            [training]
            mode = "fast"
            reward = 50.0

            [random]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.maze.rows, 20);
        assert_eq!(config.maze.cols, 10);
        assert_eq!(config.random.seed, Some(42));

        let training = config.training.resolve();
        assert_eq!(training.episodes_per_percent, 100);
        assert_eq!(training.max_steps_per_episode, 100);
        assert_eq!(training.reward, 50.0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Config::from_toml_str("[maze]\nrows = 51\n").is_err());
        assert!(Config::from_toml_str("[cave]\nchance = 1.5\n").is_err());
        assert!(Config::from_toml_str("[cave]\nbirth = 8\n").is_err());
        assert!(Config::from_toml_str("[training]\nmax_steps_per_episode = 0\n").is_err());
        assert!(matches!(
            Config::from_toml_str("[training]\nmode = \"slow\"\n"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }
}
