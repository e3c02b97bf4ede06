//! Error types for the labyrinth crate

use thiserror::Error;

/// Main error type for maze, cave and agent operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid dimensions {rows}x{cols} (each side must be 1..=50)")]
    InvalidDimensions { rows: i64, cols: i64 },

    #[error("cell ({row}, {col}) is outside the grid")]
    InvalidCell { row: i32, col: i32 },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid wall value '{value}': {message}")]
    InvalidWireValue { value: String, message: String },

    #[error("agent has not been initialized with a grid and goal")]
    AgentNotInitialized,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for labyrinth operations
pub type Result<T> = std::result::Result<T, Error>;
