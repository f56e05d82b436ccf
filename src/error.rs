//! Error handling module for orchrun
//!
//! Domain errors use this `thiserror` enum. Application plumbing (main,
//! runner, config loading) wraps them in `anyhow` with context.
//!
//! Secret values must never be formatted into any of these messages; only
//! parameter names are reported.

use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

/// Main error type for orchrun
#[derive(Error, Debug)]
pub enum OrchError {
    /// A parameter combination failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required parameter was not supplied on the command line, in the
    /// environment, or in the config file
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    /// Two parameters that exclude each other were both supplied
    #[error("Conflicting parameters: {first} and {second} cannot be used together")]
    ConflictingParameters { first: String, second: String },

    /// The external CLI executable could not be located
    #[error("{name} not found (searched: {})", format_searched(.searched))]
    CliNotFound { name: String, searched: Vec<PathBuf> },

    /// Configuration errors (loading, parsing, forbidden fields)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external CLI could not be spawned or waited on
    #[error("Failed to launch {path}: {reason}")]
    Launch { path: PathBuf, reason: String },
}

/// Result type alias for orchrun operations
pub type Result<T> = std::result::Result<T, OrchError>;

fn format_searched(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return "nothing".to_string();
    }
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl OrchError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a missing-parameter error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create a conflicting-parameters error
    pub fn conflict(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::ConflictingParameters {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Exit code the wrapper reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_)
            | Self::MissingParameter { .. }
            | Self::ConflictingParameters { .. }
            | Self::Config(_) => exit_codes::USAGE,
            Self::CliNotFound { .. } => exit_codes::CLI_NOT_FOUND,
            Self::Launch { .. } => exit_codes::FAILURE,
        }
    }
}
