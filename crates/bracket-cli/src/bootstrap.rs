//! CLI bootstrap - the composition root.
//!
//! This is the only place where the launcher's adapters are chosen:
//! - `TokioProcessSpawner` for the backend process
//! - `HttpHealthCheck` against the configured health URL
//! - `BrowserSurface` or `HeadlessSurface` for the UI
//! - `ConsoleReporter` for fatal errors

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bracket_core::{DesktopConfig, RunMode, WindowSurface, resolve_backend_executable};
use bracket_runtime::{
    ControllerHandle, HttpHealthCheck, LifecycleController, LifecycleDeps, TokioProcessSpawner,
};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;
use crate::surfaces::{BrowserSurface, ConsoleReporter, HeadlessSurface};

/// Layer the parsed arguments over the built-in defaults.
pub fn build_config(cli: &Cli) -> Result<DesktopConfig, CliError> {
    let mut config = DesktopConfig::for_mode(RunMode::from_dev_flag(cli.dev));
    // A browser tab cannot be re-activated, so a failed startup ends the session
    config.quit_on_last_window_closed = true;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(path) = &cli.backend_path {
        config.backend_path = Some(path.clone());
    }
    if let Some(url) = &cli.dev_url {
        config.dev_frontend_url.clone_from(url);
    }
    if let Some(ms) = cli.shutdown_grace_ms {
        config.shutdown_grace = Duration::from_millis(ms);
    }
    config.validate()?;
    Ok(config)
}

/// Resolve the backend executable for `config`.
pub fn backend_executable(config: &DesktopConfig) -> Result<PathBuf, CliError> {
    let path = resolve_backend_executable(config.mode, config.backend_path.as_deref())?;
    debug!(path = %path.display(), "resolved backend executable");
    Ok(path)
}

/// Wire the lifecycle controller for this invocation.
pub fn bootstrap(cli: &Cli) -> Result<(LifecycleController, ControllerHandle), CliError> {
    let config = build_config(cli)?;
    let executable = backend_executable(&config)?;
    let health = HttpHealthCheck::new(config.health_url()?, config.readiness.request_timeout)?;

    let surface: Arc<dyn WindowSurface> = if cli.headless {
        Arc::new(HeadlessSurface)
    } else {
        Arc::new(BrowserSurface)
    };

    let deps = LifecycleDeps {
        spawner: Arc::new(TokioProcessSpawner),
        health: Arc::new(health),
        surface,
        reporter: Arc::new(ConsoleReporter),
    };

    Ok(LifecycleController::new(config, executable, deps)?)
}
