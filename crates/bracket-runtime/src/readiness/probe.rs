//! The readiness race.

use std::sync::Arc;

use bracket_core::{ReadinessConfig, ReadinessOutcome, ReadinessSignal};
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use super::health::{HealthCheck, HealthPollOutcome, poll_health};
use super::latch::OutputMatch;

/// Decides when a freshly spawned backend is usable.
#[derive(Clone)]
pub struct ReadinessProbe {
    config: ReadinessConfig,
    health: Arc<dyn HealthCheck>,
}

impl ReadinessProbe {
    pub fn new(config: ReadinessConfig, health: Arc<dyn HealthCheck>) -> Self {
        Self { config, health }
    }

    pub const fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Race the output latch, the health poll and the hard timeout.
    ///
    /// Exactly one outcome is produced; the losing branches are dropped, so
    /// a late stdout match or health success is discarded.
    pub async fn resolve(&self, output: OutputMatch) -> ReadinessOutcome {
        let started = Instant::now();
        info!(
            max_attempts = self.config.max_attempts,
            startup_timeout = ?self.config.startup_timeout,
            "Waiting for backend to be ready"
        );

        let signal = tokio::select! {
            () = output.matched() => ReadinessSignal::OutputMatched,
            outcome = poll_health(self.health.as_ref(), &self.config) => match outcome {
                HealthPollOutcome::Healthy { attempts } => ReadinessSignal::HealthCheckPassed { attempts },
                HealthPollOutcome::Exhausted { attempts } => ReadinessSignal::HealthCheckExhausted { attempts },
            },
            () = sleep(self.config.startup_timeout) => {
                info!("Backend startup timeout reached, assuming ready");
                ReadinessSignal::StartupTimeout
            }
        };

        let elapsed = started.elapsed();
        if signal.is_confirmed() {
            info!(?signal, ?elapsed, "Backend readiness resolved");
        } else {
            warn!(?signal, ?elapsed, "Backend readiness assumed without confirmation");
        }

        ReadinessOutcome { signal, elapsed }
    }
}
