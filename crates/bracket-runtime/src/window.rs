//! Single-window bookkeeping.

use std::sync::Arc;

use bracket_core::{WindowError, WindowSurface};
use tracing::{debug, info};
use url::Url;

/// The one application window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationWindow {
    pub is_open: bool,
}

/// Result of `WindowHost::create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCreation {
    Created,
    /// A window was already open; nothing happened.
    AlreadyOpen,
}

/// Puts the UI on a `WindowSurface`, keeping at most one window open.
///
/// Window and backend lifecycles are independent: closing the window never
/// touches the backend.
pub struct WindowHost {
    surface: Arc<dyn WindowSurface>,
    window: ApplicationWindow,
}

impl WindowHost {
    pub fn new(surface: Arc<dyn WindowSurface>) -> Self {
        Self {
            surface,
            window: ApplicationWindow::default(),
        }
    }

    pub const fn is_open(&self) -> bool {
        self.window.is_open
    }

    pub const fn window(&self) -> ApplicationWindow {
        self.window
    }

    /// Open a window on `url` unless one is already open.
    ///
    /// The URL is chosen by the caller; the host does not know about run modes.
    pub fn create(&mut self, url: &Url) -> Result<WindowCreation, WindowError> {
        if self.window.is_open {
            debug!(%url, "window already open, ignoring create");
            return Ok(WindowCreation::AlreadyOpen);
        }
        self.surface.open(url)?;
        self.window.is_open = true;
        info!(%url, "Application window created");
        Ok(WindowCreation::Created)
    }

    /// Record that the window was closed. Returns `false` if none was open.
    pub fn mark_closed(&mut self) -> bool {
        let was_open = self.window.is_open;
        self.window.is_open = false;
        if was_open {
            info!("Application window closed");
        }
        was_open
    }
}
