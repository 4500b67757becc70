//! Error types for the bodymetrics_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bodymetrics_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Biometric input failed validation (non-positive, non-finite, out of range)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Activity level text did not match any known level
    #[error("Unknown activity level: {0}")]
    UnknownActivityLevel(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Saved profile state error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
