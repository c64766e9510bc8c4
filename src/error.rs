//! Error types for the message-analysis library.
//!
//! Data-source failures (unreadable file, missing tables) surface here and abort
//! the run. Data-shape anomalies such as null senders or unmatched joins are not
//! errors; they are carried through the pipeline as `None` fields.

use thiserror::Error;

/// Errors that can occur while loading or analysing a chat database.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The chat database does not contain a required table
    #[error("Chat database is missing the `{0}` table")]
    MissingTable(String),

    /// A stored timestamp could not be converted to a calendar date
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Result with `AnalysisError`
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
