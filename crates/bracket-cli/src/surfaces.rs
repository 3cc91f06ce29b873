//! Window surfaces and error reporters for a terminal session.

use std::io::Write;

use bracket_core::{ErrorReporter, WindowError, WindowSurface};
use tracing::info;
use url::Url;

/// Opens the UI in the default browser.
///
/// The browser tab is not observable, so no `WindowClosed` ever comes back
/// from this surface; the session ends on Ctrl-C.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSurface;

impl WindowSurface for BrowserSurface {
    fn open(&self, url: &Url) -> Result<(), WindowError> {
        info!(%url, "Opening Bracket in the default browser");
        open::that(url.as_str()).map_err(|e| WindowError::Create(e.to_string()))
    }
}

/// Only prints where the UI can be reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl WindowSurface for HeadlessSurface {
    fn open(&self, url: &Url) -> Result<(), WindowError> {
        println!("Bracket is running at {url}");
        Ok(())
    }
}

/// Writes fatal errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report(&self, title: &str, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "\n{title}\n{}\n{message}\n", "=".repeat(title.len()));
    }
}
