//! Port definitions (trait abstractions) for the shell's outer surfaces.
//!
//! Ports define what the lifecycle core needs from the outside world:
//! somewhere to show the UI and somewhere to show fatal errors. They contain
//! no toolkit types; Tauri, the system browser and test doubles all
//! implement them in their own crates.

pub mod error_reporter;
pub mod window_surface;

pub use error_reporter::ErrorReporter;
pub use window_surface::{WindowError, WindowSurface};
