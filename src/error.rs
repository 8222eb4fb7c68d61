use std::path::PathBuf;

/// Errors returned by turn-taking operations. None of them change the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} out of range (expected 0..7)")]
    OutOfRange(i32),

    #[error("invalid move: column {column} is full or invalid")]
    InvalidMove { column: usize },

    #[error("no valid column provided for opponent")]
    NoColumnProvided,

    #[error("game is over; reset to play again")]
    GameOver,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
