//! Process-level value types shared between the runtime and adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Observed termination of the backend child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitReport {
    /// Exit code, or `None` when the process was ended by a signal.
    pub code: Option<i32>,
}

impl ExitReport {
    pub const fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    /// Clean exit with status 0.
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<std::process::ExitStatus> for ExitReport {
    fn from(status: std::process::ExitStatus) -> Self {
        Self::new(status.code())
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Termination signal sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationSignal {
    /// SIGTERM-equivalent; lets the backend shut down on its own.
    Graceful,
    /// SIGKILL-equivalent; not negotiable.
    Forceful,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graceful => f.write_str("graceful"),
            Self::Forceful => f.write_str("forceful"),
        }
    }
}
