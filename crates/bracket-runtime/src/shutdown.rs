//! Graceful-then-forced backend shutdown.

use std::time::Duration;

use bracket_core::{DEFAULT_SHUTDOWN_GRACE, ExitReport, TerminationSignal};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::process::ProcessHandle;

/// How long to wait for the OS to reap the child after a forced kill.
const REAP_TIMEOUT: Duration = Duration::from_millis(1000);

/// How a `stop` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The backend had already exited; no signal was sent.
    AlreadyExited(ExitReport),
    /// The backend exited within the grace period.
    Graceful(ExitReport),
    /// The grace period elapsed and a forceful signal was sent. `None` if the
    /// exit was not observed within the reap timeout either.
    Forced(Option<ExitReport>),
    /// `stop` had already run; nothing was done.
    Skipped,
}

/// Runs the two-phase termination at most once per application lifetime.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    grace: Duration,
    stopped: bool,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_SHUTDOWN_GRACE)
    }
}

impl ShutdownCoordinator {
    pub const fn new(grace: Duration) -> Self {
        Self {
            grace,
            stopped: false,
        }
    }

    pub const fn has_stopped(&self) -> bool {
        self.stopped
    }

    /// Stop the backend behind `handle`.
    ///
    /// The termination flag is set before any signal goes out, so the exit
    /// this causes is never classified as premature. Once started, the
    /// escalation to a forceful signal is not cancellable.
    pub async fn stop(&mut self, handle: &mut ProcessHandle) -> ShutdownOutcome {
        if self.stopped {
            debug!(pid = ?handle.pid(), "shutdown already ran, skipping");
            return ShutdownOutcome::Skipped;
        }
        self.stopped = true;
        handle.request_termination();

        if let Some(report) = handle.exit_report() {
            info!(pid = ?handle.pid(), %report, "Backend already exited, nothing to stop");
            return ShutdownOutcome::AlreadyExited(report);
        }

        info!(pid = ?handle.pid(), grace = ?self.grace, "Stopping backend process");
        if let Err(e) = handle.signal(TerminationSignal::Graceful) {
            warn!(pid = ?handle.pid(), error = %e, "Failed to send graceful termination signal");
        }

        if let Ok(report) = timeout(self.grace, handle.wait_for_exit()).await {
            info!(pid = ?handle.pid(), %report, "Backend stopped gracefully");
            return ShutdownOutcome::Graceful(report);
        }

        warn!(pid = ?handle.pid(), grace = ?self.grace, "Backend did not exit in time, forcing termination");
        if let Err(e) = handle.signal(TerminationSignal::Forceful) {
            warn!(pid = ?handle.pid(), error = %e, "Failed to send forceful termination signal");
        }

        let report = timeout(REAP_TIMEOUT, handle.wait_for_exit()).await.ok();
        match report {
            Some(report) => info!(pid = ?handle.pid(), %report, "Backend force killed"),
            None => warn!(pid = ?handle.pid(), "Backend exit not observed after forced kill"),
        }
        ShutdownOutcome::Forced(report)
    }
}
