//! Shell state and composition helpers.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Mutex;

use bracket_core::{DesktopConfig, RunMode, backend_executable_name, resolve_backend_executable};
use bracket_runtime::ControllerHandle;
use tauri::{App, Manager};
use tracing::{debug, warn};

/// Label of the single application window.
pub const MAIN_WINDOW: &str = "main";

const MIN_ZOOM: f64 = 0.3;
const MAX_ZOOM: f64 = 3.0;

/// State managed by Tauri and shared with event handlers.
pub struct ShellState {
    pub controller: ControllerHandle,
    zoom: Mutex<f64>,
}

impl ShellState {
    pub const fn new(controller: ControllerHandle) -> Self {
        Self {
            controller,
            zoom: Mutex::new(1.0),
        }
    }

    /// Set the zoom factor and return the applied value.
    pub fn set_zoom(&self, factor: f64) -> f64 {
        let clamped = factor.clamp(MIN_ZOOM, MAX_ZOOM);
        match self.zoom.lock() {
            Ok(mut zoom) => *zoom = clamped,
            Err(poisoned) => *poisoned.into_inner() = clamped,
        }
        clamped
    }

    /// Change the zoom factor by `delta` and return the applied value.
    pub fn adjust_zoom(&self, delta: f64) -> f64 {
        let current = self.zoom.lock().map_or(1.0, |zoom| *zoom);
        self.set_zoom(current + delta)
    }
}

/// Desktop configuration from the command line and environment.
pub fn desktop_config() -> DesktopConfig {
    let dev = std::env::args().any(|arg| arg == "--dev");
    let mut config = DesktopConfig::for_mode(RunMode::from_dev_flag(dev));

    if let Ok(port) = std::env::var("BRACKET_PORT") {
        match port.parse() {
            Ok(port) => config.port = port,
            Err(e) => warn!(%port, error = %e, "Ignoring invalid BRACKET_PORT"),
        }
    }
    if let Some(path) = std::env::var_os("BRACKET_BACKEND_PATH") {
        config.backend_path = Some(PathBuf::from(path));
    }
    if let Ok(url) = std::env::var("BRACKET_DEV_URL") {
        config.dev_frontend_url = url;
    }
    config
}

/// Resolve the backend executable, preferring Tauri's resource directory
/// for packaged builds.
pub fn backend_executable(app: &App, config: &DesktopConfig) -> Result<PathBuf, Box<dyn Error>> {
    if config.backend_path.is_none() && !config.mode.is_development() {
        match app.path().resource_dir() {
            Ok(dir) => return Ok(dir.join("app").join(backend_executable_name())),
            Err(e) => debug!(error = %e, "No Tauri resource dir, using default resolution"),
        }
    }
    Ok(resolve_backend_executable(
        config.mode,
        config.backend_path.as_deref(),
    )?)
}
