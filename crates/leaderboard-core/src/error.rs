use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the leaderboard crates.
///
/// Aggregation itself never fails; these only surface at the I/O and
/// configuration boundary.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// No puzzle snapshot could be located.
    #[error("Puzzle data file not found: {0}")]
    DataFileNotFound(PathBuf),

    /// A date or month-key string could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A time zone name is not a recognised IANA identifier.
    #[error("Invalid time zone: {0}")]
    InvalidTimezone(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the leaderboard crates.
pub type Result<T> = std::result::Result<T, LeaderboardError>;
