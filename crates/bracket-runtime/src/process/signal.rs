//! Termination primitives for the backend child.
//!
//! Graceful termination is SIGTERM on Unix and a non-forced `taskkill` on
//! Windows. Forceful termination goes through the exit-waiter task, which
//! owns the `Child` and calls `start_kill` (SIGKILL / `TerminateProcess`).

use std::io;

use tokio::sync::mpsc;
use tracing::debug;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Sends termination signals to one child process.
pub trait ProcessSignaller: Send + Sync {
    /// Ask the process to shut down on its own.
    fn terminate(&self) -> io::Result<()>;

    /// End the process unconditionally.
    fn kill(&self) -> io::Result<()>;
}

/// Signaller for a child spawned by `TokioProcessSpawner`.
#[derive(Debug)]
pub struct ChildSignaller {
    pid: Option<u32>,
    kill_tx: mpsc::UnboundedSender<()>,
}

impl ChildSignaller {
    pub(crate) const fn new(pid: Option<u32>, kill_tx: mpsc::UnboundedSender<()>) -> Self {
        Self { pid, kill_tx }
    }
}

impl ProcessSignaller for ChildSignaller {
    fn terminate(&self) -> io::Result<()> {
        let pid = self
            .pid
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "child has no PID"))?;
        send_graceful(pid)
    }

    fn kill(&self) -> io::Result<()> {
        // Waiter gone means the child was already reaped
        if self.kill_tx.send(()).is_err() {
            debug!(pid = ?self.pid, "kill skipped: process already exited");
        }
        Ok(())
    }
}

#[cfg(unix)]
fn send_graceful(pid: u32) -> io::Result<()> {
    let raw = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;
    match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) => Ok(()),
        // Process may have already exited
        Err(nix::errno::Errno::ESRCH) => {
            debug!(pid, "SIGTERM skipped: no such process");
            Ok(())
        }
        Err(e) => Err(io::Error::other(e)),
    }
}

#[cfg(windows)]
fn send_graceful(pid: u32) -> io::Result<()> {
    use std::os::windows::process::CommandExt;
    use std::process::{Command, Stdio};

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    // Without /f taskkill asks the process tree to close instead of terminating it
    Command::new("taskkill")
        .args(["/pid", &pid.to_string(), "/t"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(CREATE_NO_WINDOW)
        .spawn()
        .map(drop)
}

#[cfg(not(any(unix, windows)))]
fn send_graceful(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "graceful termination is not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminate_without_pid_is_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let signaller = ChildSignaller::new(None, tx);
        let err = signaller.terminate().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn kill_after_waiter_exit_is_ok() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let signaller = ChildSignaller::new(Some(1), tx);
        assert!(signaller.kill().is_ok());
    }
}
