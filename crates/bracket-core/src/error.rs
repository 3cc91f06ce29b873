//! Lifecycle error taxonomy.
//!
//! Every failure the shell can hit is classified here, together with
//! whether it is fatal and whether it is surfaced to the user as a modal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

const INIT_ERROR_TITLE: &str = "Initialization Error";
const BACKEND_ERROR_TITLE: &str = "Backend Error";

/// Failures of the backend lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The resolved backend executable does not exist.
    #[error("Backend executable not found at: {}", path.display())]
    ExecutableNotFound { path: PathBuf },

    /// The OS refused to create the backend process.
    #[error("Failed to spawn backend {}: {source}", path.display())]
    SpawnError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend exited abnormally while no shutdown was requested.
    #[error("Backend process exited unexpectedly ({})", describe_code(*code))]
    PrematureExit { code: Option<i32> },

    /// Every health probe failed. Absorbed by the fail-open readiness policy.
    #[error("Backend health check failed after {attempts} attempts")]
    HealthCheckExhausted { attempts: u32 },

    /// Anything else that went wrong inside the controller.
    #[error("Unhandled runtime error: {0}")]
    UnhandledRuntime(String),
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| format!("code {c}"))
}

/// Title and body of a user-facing modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

impl LifecycleError {
    /// Whether the error ends the current session's startup or backend.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ExecutableNotFound { .. } | Self::SpawnError { .. } | Self::PrematureExit { .. }
        )
    }

    /// Whether the error is shown to the user as a modal.
    pub const fn is_user_visible(&self) -> bool {
        self.is_fatal()
    }

    /// Modal contents for user-visible errors, `None` for logged-only ones.
    pub fn dialog(&self) -> Option<ErrorDialog> {
        match self {
            Self::ExecutableNotFound { .. } | Self::SpawnError { .. } => Some(ErrorDialog {
                title: INIT_ERROR_TITLE.to_string(),
                message: format!(
                    "Failed to start the tournament system:\n\n{self}\n\nPlease try restarting the application."
                ),
            }),
            Self::PrematureExit { .. } => Some(ErrorDialog {
                title: BACKEND_ERROR_TITLE.to_string(),
                message: "The tournament system backend has stopped unexpectedly.".to_string(),
            }),
            Self::HealthCheckExhausted { .. } | Self::UnhandledRuntime(_) => None,
        }
    }
}

/// Invalid desktop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Port should be >= 1024 (privileged ports require root), got {0}")]
    InvalidPort(u16),

    #[error("Invalid URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    #[error("Health check must allow at least one attempt")]
    ZeroAttempts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_user_visible() {
        let not_found = LifecycleError::ExecutableNotFound {
            path: PathBuf::from("/opt/bracket/bracket-backend"),
        };
        assert!(not_found.is_fatal());
        assert!(not_found.is_user_visible());

        let exit = LifecycleError::PrematureExit { code: Some(1) };
        assert!(exit.is_user_visible());
    }

    #[test]
    fn exhausted_health_check_is_silent() {
        let err = LifecycleError::HealthCheckExhausted { attempts: 15 };
        assert!(!err.is_fatal());
        assert!(err.dialog().is_none());
        assert!(LifecycleError::UnhandledRuntime("boom".into()).dialog().is_none());
    }

    #[test]
    fn startup_dialog_embeds_the_cause() {
        let err = LifecycleError::ExecutableNotFound {
            path: PathBuf::from("/missing/bracket-backend"),
        };
        let dialog = err.dialog().unwrap();
        assert_eq!(dialog.title, "Initialization Error");
        assert!(dialog.message.contains("/missing/bracket-backend"));
        assert!(dialog.message.ends_with("Please try restarting the application."));
    }

    #[test]
    fn premature_exit_dialog() {
        let dialog = LifecycleError::PrematureExit { code: None }.dialog().unwrap();
        assert_eq!(dialog.title, "Backend Error");
        assert_eq!(
            LifecycleError::PrematureExit { code: None }.to_string(),
            "Backend process exited unexpectedly (terminated by signal)"
        );
    }
}
