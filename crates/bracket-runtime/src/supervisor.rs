//! Backend process supervision.
//!
//! `ProcessSupervisor` turns a `LaunchSpec` into a running, readiness-checked
//! backend. It never retries: a failed spawn is reported once and the user
//! restarts the application.

use std::sync::Arc;

use bracket_core::{LifecycleError, ReadinessOutcome};
use tracing::{error, info};

use crate::process::{
    LaunchSpec, ProcessHandle, ProcessSpawner, StreamKind, spawn_stream_reader,
};
use crate::readiness::{OutputMatch, ReadinessProbe, output_latch};

/// A spawned backend whose readiness has not been resolved yet.
#[derive(Debug)]
pub struct PendingBackend {
    pub handle: ProcessHandle,
    pub output: OutputMatch,
}

/// A spawned backend that has passed (or been waved through) readiness.
#[derive(Debug)]
pub struct StartedBackend {
    pub handle: ProcessHandle,
    pub readiness: ReadinessOutcome,
}

/// Spawns the backend and gates it on readiness.
pub struct ProcessSupervisor {
    spawner: Arc<dyn ProcessSpawner>,
    probe: ReadinessProbe,
}

impl ProcessSupervisor {
    pub fn new(spawner: Arc<dyn ProcessSpawner>, probe: ReadinessProbe) -> Self {
        Self { spawner, probe }
    }

    pub const fn probe(&self) -> &ReadinessProbe {
        &self.probe
    }

    /// Spawn the backend and attach the output readers.
    ///
    /// The executable must exist; otherwise nothing is spawned and
    /// `ExecutableNotFound` is returned.
    pub fn spawn(&self, spec: &LaunchSpec) -> Result<PendingBackend, LifecycleError> {
        let program = spec.program();
        if !program.exists() {
            error!(path = %program.display(), "Backend executable not found");
            return Err(LifecycleError::ExecutableNotFound {
                path: program.to_path_buf(),
            });
        }

        info!(
            path = %program.display(),
            cwd = %spec.working_dir.display(),
            "Starting backend"
        );

        let spawned = self.spawner.spawn(spec).map_err(|source| {
            error!(path = %program.display(), error = %source, "Failed to spawn backend");
            LifecycleError::SpawnError {
                path: program.to_path_buf(),
                source,
            }
        })?;

        let mut handle = ProcessHandle::from(spawned);
        let pid = handle.pid();
        let (latch, output) = output_latch(self.probe.config().markers.clone());

        if let Some(stdout) = handle.take_stdout() {
            spawn_stream_reader(stdout, StreamKind::Stdout, pid, Some(latch));
        }
        if let Some(stderr) = handle.take_stderr() {
            spawn_stream_reader(stderr, StreamKind::Stderr, pid, None);
        }

        Ok(PendingBackend { handle, output })
    }

    /// Suspend until readiness resolves. Never fails (fail-open).
    pub async fn await_readiness(&self, pending: PendingBackend) -> StartedBackend {
        let PendingBackend { handle, output } = pending;
        let readiness = self.probe.resolve(output).await;
        StartedBackend { handle, readiness }
    }

    /// `spawn` followed by `await_readiness`.
    pub async fn start(&self, spec: &LaunchSpec) -> Result<StartedBackend, LifecycleError> {
        let pending = self.spawn(spec)?;
        Ok(self.await_readiness(pending).await)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use async_trait::async_trait;
    use bracket_core::{ExitReport, ReadinessConfig, ReadinessSignal};
    use tokio::sync::{mpsc, watch};

    use super::*;
    use crate::process::{ChildSignaller, MockProcessSpawner, SpawnedProcess};
    use crate::readiness::{HealthCheck, HealthCheckError};

    struct Healthy;

    #[async_trait]
    impl HealthCheck for Healthy {
        async fn check(&self) -> Result<(), HealthCheckError> {
            Ok(())
        }
    }

    fn supervisor(spawner: MockProcessSpawner) -> ProcessSupervisor {
        let probe = ReadinessProbe::new(ReadinessConfig::default(), Arc::new(Healthy));
        ProcessSupervisor::new(Arc::new(spawner), probe)
    }

    fn existing_program() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn missing_executable_never_reaches_spawner() {
        let mut spawner = MockProcessSpawner::new();
        spawner.expect_spawn().times(0);

        let spec = LaunchSpec::for_executable("/nonexistent/dist/bracket-backend", Vec::new());
        let err = supervisor(spawner).spawn(&spec).unwrap_err();

        assert!(matches!(err, LifecycleError::ExecutableNotFound { .. }));
        assert!(err.is_user_visible());
    }

    #[test]
    fn spawner_failure_is_a_spawn_error() {
        let program = existing_program();
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn()
            .times(1)
            .returning(|_| Err(io::Error::from(io::ErrorKind::PermissionDenied)));

        let spec = LaunchSpec::for_executable(program.path(), Vec::new());
        let err = supervisor(spawner).spawn(&spec).unwrap_err();

        match err {
            LifecycleError::SpawnError { path, source } => {
                assert_eq!(path, program.path());
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawned_backend_is_passed_to_the_probe() {
        let program = existing_program();
        let expected_program = program.path().to_path_buf();
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_spawn()
            .withf(move |spec| {
                spec.program == expected_program
                    && spec.env.iter().any(|(k, v)| k == "PORT" && v == "8400")
            })
            .times(1)
            .returning(|_| {
                let (kill_tx, _kill_rx) = mpsc::unbounded_channel();
                let (_exit_tx, exit_rx) = watch::channel::<Option<ExitReport>>(None);
                Ok(SpawnedProcess {
                    pid: Some(31337),
                    stdout: None,
                    stderr: None,
                    exit: exit_rx,
                    signaller: Arc::new(ChildSignaller::new(Some(31337), kill_tx)),
                })
            });

        let spec = LaunchSpec::for_executable(
            program.path(),
            vec![("PORT".to_string(), "8400".to_string())],
        );
        let started = supervisor(spawner).start(&spec).await.unwrap();

        assert_eq!(started.handle.pid(), Some(31337));
        assert!(!started.handle.termination_requested());
        assert_eq!(
            started.readiness.signal,
            ReadinessSignal::HealthCheckPassed { attempts: 1 }
        );
    }
}
