//! The single live backend process.

use std::fmt;
use std::io;
use std::sync::Arc;

use bracket_core::{ExitReport, TerminationSignal};
use tokio::sync::watch;
use tracing::{debug, info};

use super::signal::ProcessSignaller;
use super::spawn::{OutputStream, SpawnedProcess};

/// Handle to the running backend.
///
/// Owned exclusively by the controller, so the termination flag needs no
/// synchronisation. The handle is dropped once its exit has been handled.
pub struct ProcessHandle {
    pid: Option<u32>,
    stdout: Option<OutputStream>,
    stderr: Option<OutputStream>,
    exit: watch::Receiver<Option<ExitReport>>,
    termination_requested: bool,
    signaller: Arc<dyn ProcessSignaller>,
}

impl ProcessHandle {
    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Take the stdout pipe for a reader; `None` once taken.
    pub fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout.take()
    }

    /// Take the stderr pipe for a reader; `None` once taken.
    pub fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr.take()
    }

    /// Exit status, if the exit has already been observed.
    pub fn exit_report(&self) -> Option<ExitReport> {
        *self.exit.borrow()
    }

    pub fn has_exited(&self) -> bool {
        self.exit_report().is_some()
    }

    pub const fn termination_requested(&self) -> bool {
        self.termination_requested
    }

    /// Mark the coming exit as expected.
    ///
    /// Must happen before any termination signal is sent.
    pub fn request_termination(&mut self) {
        if !self.termination_requested {
            debug!(pid = ?self.pid, "termination requested");
        }
        self.termination_requested = true;
    }

    /// Send a termination signal unless the process has already exited.
    pub fn signal(&self, signal: TerminationSignal) -> io::Result<()> {
        if let Some(report) = self.exit_report() {
            debug!(pid = ?self.pid, %signal, %report, "signal skipped: process already exited");
            return Ok(());
        }
        info!(pid = ?self.pid, %signal, "Sending termination signal to backend");
        match signal {
            TerminationSignal::Graceful => self.signaller.terminate(),
            TerminationSignal::Forceful => self.signaller.kill(),
        }
    }

    /// Wait until the exit is observed.
    ///
    /// Cancel safe. A vanished exit waiter is reported as a signal-terminated exit.
    pub async fn wait_for_exit(&mut self) -> ExitReport {
        let waited = self.exit.wait_for(Option::is_some).await.map(|report| *report);
        let observed = match waited {
            Ok(report) => report,
            Err(_) => *self.exit.borrow(),
        };
        observed.unwrap_or(ExitReport::new(None))
    }
}

impl From<SpawnedProcess> for ProcessHandle {
    fn from(spawned: SpawnedProcess) -> Self {
        Self {
            pid: spawned.pid,
            stdout: spawned.stdout,
            stderr: spawned.stderr,
            exit: spawned.exit,
            termination_requested: false,
            signaller: spawned.signaller,
        }
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("exit", &self.exit_report())
            .field("termination_requested", &self.termination_requested)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingSignaller {
        sent: Mutex<Vec<TerminationSignal>>,
    }

    impl ProcessSignaller for RecordingSignaller {
        fn terminate(&self) -> io::Result<()> {
            self.sent.lock().unwrap().push(TerminationSignal::Graceful);
            Ok(())
        }

        fn kill(&self) -> io::Result<()> {
            self.sent.lock().unwrap().push(TerminationSignal::Forceful);
            Ok(())
        }
    }

    fn handle_with(
        signaller: Arc<RecordingSignaller>,
    ) -> (ProcessHandle, watch::Sender<Option<ExitReport>>) {
        let (tx, rx) = watch::channel(None);
        let handle = ProcessHandle::from(SpawnedProcess {
            pid: Some(4242),
            stdout: None,
            stderr: None,
            exit: rx,
            signaller,
        });
        (handle, tx)
    }

    #[test]
    fn termination_flag_starts_clear() {
        let (mut handle, _tx) = handle_with(Arc::default());
        assert!(!handle.termination_requested());
        handle.request_termination();
        handle.request_termination();
        assert!(handle.termination_requested());
    }

    #[test]
    fn signals_are_dispatched_while_alive() {
        let signaller = Arc::new(RecordingSignaller::default());
        let (handle, _tx) = handle_with(Arc::clone(&signaller));

        handle.signal(TerminationSignal::Graceful).unwrap();
        handle.signal(TerminationSignal::Forceful).unwrap();
        assert_eq!(
            *signaller.sent.lock().unwrap(),
            vec![TerminationSignal::Graceful, TerminationSignal::Forceful]
        );
    }

    #[test]
    fn signals_are_skipped_after_exit() {
        let signaller = Arc::new(RecordingSignaller::default());
        let (handle, tx) = handle_with(Arc::clone(&signaller));
        tx.send(Some(ExitReport::new(Some(0)))).unwrap();

        assert!(handle.has_exited());
        handle.signal(TerminationSignal::Forceful).unwrap();
        assert!(signaller.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wait_for_exit_returns_published_report() {
        let (mut handle, tx) = handle_with(Arc::default());
        tokio::spawn(async move {
            let _ = tx.send(Some(ExitReport::new(Some(3))));
        });
        assert_eq!(handle.wait_for_exit().await, ExitReport::new(Some(3)));
    }

    #[tokio::test]
    async fn dropped_waiter_counts_as_signal_exit() {
        let (mut handle, tx) = handle_with(Arc::default());
        drop(tx);
        assert_eq!(handle.wait_for_exit().await, ExitReport::new(None));
    }
}
