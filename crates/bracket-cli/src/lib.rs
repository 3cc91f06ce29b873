//! Headless launcher for the Bracket desktop shell.
//!
//! Runs the same lifecycle controller as the native shell, but shows the UI
//! in the system browser and reports fatal errors on stderr.

pub mod bootstrap;
pub mod error;
pub mod logging;
pub mod parser;
pub mod surfaces;

// Re-export primary types for convenient access
pub use bootstrap::{bootstrap, build_config};
pub use error::CliError;
pub use parser::Cli;
