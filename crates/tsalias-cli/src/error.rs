//! Error handling for the tsalias CLI.
//!
//! `CliError` is the top-level error returned by commands. Setup failures
//! come from `tsalias-core` unchanged; configuration problems carry their own
//! hint. `main` turns every error into a miette report through
//! [`cli_error_to_miette`].

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;
use tsalias_core::SetupError;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failure reported by the setup pipeline
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Configuration-related errors (missing file, bad values)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors outside the setup pipeline
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--config` points at a file that does not exist
    #[error("Config file not found: {}\n\nHint: Create the file or drop the --config flag", .0.display())]
    NotFound(PathBuf),

    /// Layered configuration could not be extracted
    #[error("{message}\n\nHint: {hint}")]
    Invalid {
        message: String,
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Setup(e) => {
            let mut message = e.to_string();
            if let SetupError::SubprocessFailure { output, .. } = &e {
                if !output.trim().is_empty() {
                    message.push_str("\n\n");
                    message.push_str(output.trim_end());
                }
            }
            match e.hint() {
                Some(hint) => miette::miette!("{}\n\nHint: {}", message, hint),
                None => miette::miette!("{}", message),
            }
        }
        other => miette::miette!("{}", other),
    }
}
