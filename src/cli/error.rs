//! CLI-level errors (wraps domain and config errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{LayoutError, TransitionError};
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Layout(#[from] LayoutError),

    #[error("{0}")]
    Transition(#[from] TransitionError),

    #[error("cannot read '{path}': {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Layout(_) => exitcode::DATAERR,
            CliError::Transition(_) => exitcode::SOFTWARE,
            CliError::Input { .. } => exitcode::NOINPUT,
            CliError::Config(_) => exitcode::CONFIG,
            CliError::InvalidArgs(_) => exitcode::USAGE,
            CliError::Json(_) | CliError::Toml(_) => exitcode::SOFTWARE,
        }
    }
}
