//! CLI-specific error types and exit codes.

use bracket_core::{ConfigError, PathError};
use bracket_runtime::HealthCheckError;
use thiserror::Error;

/// Errors that stop the launcher before or around the lifecycle run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The lifecycle ended in `Failed`.
    #[error("{0}")]
    Lifecycle(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (log directory, current executable, ...).
    #[error("IO error: {0}")]
    Io(String),

    /// Process or runtime setup error.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits:
    /// - 1: General error
    /// - 71: EX_OSERR
    /// - 74: EX_IOERR
    /// - 78: EX_CONFIG
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Lifecycle(_) => 1,
            Self::Process(_) => 71,
            Self::Io(_) => 74,
            Self::Config(_) => 78,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<HealthCheckError> for CliError {
    fn from(err: HealthCheckError) -> Self {
        Self::Process(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
