//! Readiness policy for the backend process.
//!
//! Readiness is decided by whichever of three signals arrives first: a
//! startup marker on stdout, a successful health probe, or the hard startup
//! timeout. Exhausting the health probe also counts as ready (fail-open).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stdout substrings that mark backend startup completion.
pub const DEFAULT_READY_MARKERS: [&str; 2] = ["Uvicorn running", "Application startup complete"];

/// Path probed on the backend to confirm it is serving.
pub const DEFAULT_HEALTH_PATH: &str = "/docs";

/// Tunables for one probing cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessConfig {
    /// Total health-probe attempts before giving up (fail-open).
    pub max_attempts: u32,
    /// Delay between failed health-probe attempts.
    pub interval: Duration,
    /// Per-request timeout for a single health probe.
    pub request_timeout: Duration,
    /// Hard ceiling after which readiness is assumed.
    pub startup_timeout: Duration,
    /// HTTP path probed on the backend.
    pub health_path: String,
    /// Literal stdout substrings that signal readiness.
    pub markers: Vec<String>,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 15,
            interval: Duration::from_millis(1000),
            request_timeout: Duration::from_millis(2000),
            startup_timeout: Duration::from_millis(10_000),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            markers: DEFAULT_READY_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Attempt bookkeeping for the active health poll.
///
/// Scoped to one probing cycle and dropped once readiness resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessAttempt {
    count: u32,
    max_attempts: u32,
}

impl ReadinessAttempt {
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            count: 0,
            max_attempts,
        }
    }

    /// Record one more attempt; returns the 1-based attempt number.
    pub const fn record(&mut self) -> u32 {
        self.count += 1;
        self.count
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// No attempts left.
    pub const fn is_exhausted(&self) -> bool {
        self.count >= self.max_attempts
    }
}

/// Which signal resolved readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "camelCase")]
pub enum ReadinessSignal {
    /// A startup marker appeared on the backend's stdout.
    OutputMatched,
    /// The health endpoint answered with a 2xx status.
    HealthCheckPassed { attempts: u32 },
    /// Every health probe failed; proceeding anyway.
    HealthCheckExhausted { attempts: u32 },
    /// Neither signal arrived before the hard startup timeout.
    StartupTimeout,
}

impl ReadinessSignal {
    /// Whether readiness was actually observed rather than assumed.
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::OutputMatched | Self::HealthCheckPassed { .. })
    }
}

/// Resolved readiness for one startup cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessOutcome {
    pub signal: ReadinessSignal,
    /// Time from the start of probing to resolution.
    pub elapsed: Duration,
}

/// Test a stdout line against the readiness markers.
pub fn line_signals_ready<S: AsRef<str>>(line: &str, markers: &[S]) -> bool {
    markers.iter().any(|marker| line.contains(marker.as_ref()))
}
