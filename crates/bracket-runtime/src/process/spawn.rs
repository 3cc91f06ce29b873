//! Backend process spawning.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use bracket_core::ExitReport;
use bracket_core::paths::backend_working_dir;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::signal::{ChildSignaller, ProcessSignaller};

/// Boxed readable end of a child's output pipe.
pub type OutputStream = Box<dyn AsyncRead + Send + Unpin>;

/// Everything needed to launch the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Executable to run. No arguments are passed.
    pub program: PathBuf,
    /// Environment overlay applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// Working directory of the child.
    pub working_dir: PathBuf,
}

impl LaunchSpec {
    /// Launch `program` from its own directory with the given overlay.
    pub fn for_executable(program: impl Into<PathBuf>, env: Vec<(String, String)>) -> Self {
        let program = program.into();
        let working_dir = backend_working_dir(&program);
        Self {
            program,
            env,
            working_dir,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// A freshly spawned child, before it is wrapped in a `ProcessHandle`.
pub struct SpawnedProcess {
    pub pid: Option<u32>,
    pub stdout: Option<OutputStream>,
    pub stderr: Option<OutputStream>,
    /// `None` until the exit has been observed.
    pub exit: watch::Receiver<Option<ExitReport>>,
    pub signaller: Arc<dyn ProcessSignaller>,
}

impl fmt::Debug for SpawnedProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnedProcess")
            .field("pid", &self.pid)
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .field("exit", &*self.exit.borrow())
            .finish_non_exhaustive()
    }
}

/// Creates backend processes.
///
/// Must be called from within a tokio runtime.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<SpawnedProcess>;
}

/// Spawner backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessSpawner;

impl ProcessSpawner for TokioProcessSpawner {
    fn spawn(&self, spec: &LaunchSpec) -> io::Result<SpawnedProcess> {
        let mut cmd = Command::new(&spec.program);
        cmd.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&spec.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A dropped waiter (runtime teardown) must never leave the backend running
            .kill_on_drop(true);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = cmd.spawn()?;
        let pid = child.id();
        info!(pid = ?pid, program = %spec.program.display(), "Backend process spawned");

        let stdout = child
            .stdout
            .take()
            .map(|s| Box::new(s) as OutputStream);
        let stderr = child
            .stderr
            .take()
            .map(|s| Box::new(s) as OutputStream);

        let (exit_tx, exit_rx) = watch::channel(None);
        let (kill_tx, kill_rx) = mpsc::unbounded_channel();
        spawn_exit_waiter(child, exit_tx, kill_rx);

        Ok(SpawnedProcess {
            pid,
            stdout,
            stderr,
            exit: exit_rx,
            signaller: Arc::new(ChildSignaller::new(pid, kill_tx)),
        })
    }
}

/// Own `child` until it exits, executing forced kills on request.
fn spawn_exit_waiter(
    mut child: Child,
    exit_tx: watch::Sender<Option<ExitReport>>,
    mut kill_rx: mpsc::UnboundedReceiver<()>,
) {
    tokio::spawn(async move {
        let pid = child.id();
        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                Some(()) = kill_rx.recv() => {
                    debug!(pid = ?pid, "forced kill requested");
                    if let Err(e) = child.start_kill() {
                        warn!(pid = ?pid, error = %e, "Failed to force kill backend process");
                    }
                }
            }
        };

        let report = match status {
            Ok(status) => ExitReport::from(status),
            Err(e) => {
                warn!(pid = ?pid, error = %e, "Failed to wait for backend process");
                ExitReport::new(None)
            }
        };
        info!(pid = ?pid, code = ?report.code, "Backend process exited");
        let _ = exit_tx.send(Some(report));
    });
}
