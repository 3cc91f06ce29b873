//! Tauri webview as the application window.

use tauri::{AppHandle, WebviewUrl, WebviewWindowBuilder};
use tracing::{info, warn};
use url::Url;

use bracket_core::{WindowError, WindowSurface};

use crate::app::MAIN_WINDOW;

const TITLE: &str = "Bracket Tournament System";

/// Opens the main webview window on the hosted UI.
pub struct TauriWindowSurface {
    app: AppHandle,
    devtools: bool,
}

impl TauriWindowSurface {
    pub const fn new(app: AppHandle, devtools: bool) -> Self {
        Self { app, devtools }
    }
}

impl WindowSurface for TauriWindowSurface {
    fn open(&self, url: &Url) -> Result<(), WindowError> {
        let origin = url.origin();
        let window = WebviewWindowBuilder::new(&self.app, MAIN_WINDOW, WebviewUrl::External(url.clone()))
            .title(TITLE)
            .inner_size(1400.0, 900.0)
            .min_inner_size(1000.0, 700.0)
            .on_navigation(move |target| {
                if target.origin() == origin {
                    return true;
                }
                // External links go to the system browser
                if let Err(e) = open::that(target.as_str()) {
                    warn!(url = %target, error = %e, "Failed to open external link");
                }
                false
            })
            .build()
            .map_err(|e| WindowError::Create(e.to_string()))?;

        if self.devtools {
            window.open_devtools();
            info!("DevTools opened for debugging");
        }
        Ok(())
    }
}
