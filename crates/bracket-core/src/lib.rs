//! Core domain types and port definitions for the Bracket desktop shell.
//!
//! This crate is pure policy: lifecycle states, readiness rules, the error
//! taxonomy, configuration and path resolution, plus the traits that adapters
//! implement to put a window on screen or show a modal. It never spawns a
//! process or opens a socket; that lives in `bracket-runtime`.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod paths;
pub mod ports;
pub mod process;
pub mod readiness;

// Re-export commonly used types for convenience
pub use config::{
    DEFAULT_BACKEND_PORT, DEFAULT_DEV_FRONTEND_URL, DEFAULT_SHUTDOWN_GRACE, DesktopConfig,
    PORT_ENV, RunMode, STANDALONE_ENV,
};
pub use error::{ConfigError, ErrorDialog, LifecycleError};
pub use lifecycle::{LifecycleMachine, LifecycleState, TransitionError};
pub use paths::{PathError, backend_executable_name, resolve_backend_executable};
pub use ports::{ErrorReporter, WindowError, WindowSurface};
pub use process::{ExitReport, TerminationSignal};
pub use readiness::{
    DEFAULT_READY_MARKERS, ReadinessAttempt, ReadinessConfig, ReadinessOutcome, ReadinessSignal,
    line_signals_ready,
};
