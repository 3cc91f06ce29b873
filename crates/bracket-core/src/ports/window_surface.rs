//! Window surface port.

use thiserror::Error;
use url::Url;

/// Failure to put the UI on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The underlying toolkit refused to create the window.
    #[error("Failed to create window: {0}")]
    Create(String),

    /// The surface is gone (application shutting down, event loop closed).
    #[error("Window surface unavailable")]
    Unavailable,
}

/// Something that can display the hosted web UI.
///
/// Implementations only open a view on `url`; the open/closed bookkeeping
/// and the single-window invariant live in `WindowHost`. Closing is reported
/// back to the controller out of band (a `WindowClosed` command).
pub trait WindowSurface: Send + Sync {
    /// Open a new window showing `url`.
    fn open(&self, url: &Url) -> Result<(), WindowError>;
}
