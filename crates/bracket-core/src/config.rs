//! Desktop shell configuration.
//!
//! Pure data with defaults and validation. Adapters layer `.env`, process
//! environment and command-line flags on top of `DesktopConfig::default()`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::readiness::ReadinessConfig;

/// Default port the backend listens on.
pub const DEFAULT_BACKEND_PORT: u16 = 8400;

/// Live frontend dev server used in development mode.
pub const DEFAULT_DEV_FRONTEND_URL: &str = "http://localhost:3000";

/// Grace period between the graceful and the forceful termination signal.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_millis(3000);

/// Environment flag telling the backend it runs embedded in the desktop shell.
pub const STANDALONE_ENV: &str = "BRACKET_STANDALONE";

/// Environment variable carrying the backend's listen port.
pub const PORT_ENV: &str = "PORT";

/// Where the backend binary and the UI come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Source checkout: backend from `dist/`, UI from the live dev server.
    Development,
    /// Packaged app: backend from bundled resources, UI served by the backend.
    #[default]
    Production,
}

impl RunMode {
    pub const fn from_dev_flag(dev: bool) -> Self {
        if dev { Self::Development } else { Self::Production }
    }

    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Resolved configuration of one desktop session.
#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub mode: RunMode,
    /// Port the backend is told to listen on.
    pub port: u16,
    /// Explicit backend executable, bypassing mode-based resolution.
    pub backend_path: Option<PathBuf>,
    /// UI location in development mode.
    pub dev_frontend_url: String,
    pub readiness: ReadinessConfig,
    /// Wait between graceful and forceful termination.
    pub shutdown_grace: Duration,
    /// Closing the only window quits the application.
    pub quit_on_last_window_closed: bool,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            port: DEFAULT_BACKEND_PORT,
            backend_path: None,
            dev_frontend_url: DEFAULT_DEV_FRONTEND_URL.to_string(),
            readiness: ReadinessConfig::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            quit_on_last_window_closed: !cfg!(target_os = "macos"),
        }
    }
}

impl DesktopConfig {
    /// Defaults for the given mode.
    pub fn for_mode(mode: RunMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Base address the backend serves on.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        parse_url(&format!("http://localhost:{}", self.port))
    }

    /// URL the window loads: dev server in development, backend otherwise.
    pub fn target_url(&self) -> Result<Url, ConfigError> {
        match self.mode {
            RunMode::Development => parse_url(&self.dev_frontend_url),
            RunMode::Production => self.backend_url(),
        }
    }

    /// Health endpoint probed during startup.
    pub fn health_url(&self) -> Result<Url, ConfigError> {
        let base = self.backend_url()?;
        base.join(&self.readiness.health_path)
            .map_err(|e| ConfigError::InvalidUrl {
                value: self.readiness.health_path.clone(),
                reason: e.to_string(),
            })
    }

    /// Environment overlay passed to the backend on top of the inherited env.
    pub fn backend_env(&self) -> Vec<(String, String)> {
        vec![
            (STANDALONE_ENV.to_string(), "true".to_string()),
            (PORT_ENV.to_string(), self.port.to_string()),
        ]
    }

    /// Reject configurations the lifecycle cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port < 1024 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.readiness.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.readiness.startup_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                name: "startup timeout",
            });
        }
        if self.readiness.request_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                name: "health request timeout",
            });
        }
        self.target_url()?;
        self.health_url()?;
        Ok(())
    }
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
