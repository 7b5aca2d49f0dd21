//! Core error types for roundbell-core.
//!
//! Segment generation and playback are total and never fail; errors only
//! arise at the edges (configuration files, parsing user input, intents
//! that do not apply to the current view).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for roundbell-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// The data directory could not be determined or created
    #[error("Cannot access data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Unrecognised training mode name
    #[error("Unknown training mode '{0}' (expected series, cluster, emom, tabata or boxing)")]
    UnknownMode(String),

    /// Unrecognised configuration field name
    #[error("Unknown configuration field '{0}'")]
    UnknownField(String),

    /// Intent that does not apply to the current view
    #[error("Cannot {intent} while in the {view} view")]
    InvalidIntent {
        intent: &'static str,
        view: &'static str,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
