//! Real-process tests for spawning, readiness and shutdown.
//!
//! Each test writes a small shell script standing in for the packaged
//! backend, so these only run on Unix.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bracket_core::{DesktopConfig, LifecycleError, ReadinessConfig, ReadinessSignal, RunMode};
use bracket_runtime::{
    HealthCheck, HealthCheckError, LaunchSpec, ProcessSupervisor, ReadinessProbe,
    ShutdownCoordinator, ShutdownOutcome, TokioProcessSpawner,
};
use tempfile::TempDir;

/// Health endpoint that never answers, so only stdout can signal readiness.
struct Unreachable;

#[async_trait]
impl HealthCheck for Unreachable {
    async fn check(&self) -> Result<(), HealthCheckError> {
        std::future::pending().await
    }
}

fn write_script(dir: &Path, body: &str, mode: u32) -> PathBuf {
    let path = dir.join("bracket-backend");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    path
}

fn supervisor() -> ProcessSupervisor {
    let probe = ReadinessProbe::new(ReadinessConfig::default(), Arc::new(Unreachable));
    ProcessSupervisor::new(Arc::new(TokioProcessSpawner), probe)
}

fn launch(program: PathBuf) -> LaunchSpec {
    let config = DesktopConfig::for_mode(RunMode::Production);
    LaunchSpec::for_executable(program, config.backend_env())
}

#[tokio::test]
async fn ready_backend_stops_gracefully() {
    let dir = TempDir::new().unwrap();
    let program = write_script(
        dir.path(),
        "echo \"INFO:     Uvicorn running on http://0.0.0.0:$PORT\"\nexec sleep 30",
        0o755,
    );

    let started = supervisor().start(&launch(program)).await.unwrap();
    assert_eq!(started.readiness.signal, ReadinessSignal::OutputMatched);
    assert!(started.readiness.elapsed < Duration::from_secs(5));

    let mut handle = started.handle;
    let outcome = ShutdownCoordinator::default().stop(&mut handle).await;
    assert!(matches!(outcome, ShutdownOutcome::Graceful(_)), "{outcome:?}");
    assert!(handle.termination_requested());
}

#[tokio::test]
async fn backend_gets_env_overlay_and_own_directory() {
    let dir = TempDir::new().unwrap();
    let program = write_script(
        dir.path(),
        "echo \"$BRACKET_STANDALONE:$PORT\" > env.txt\npwd -P > cwd.txt\necho 'INFO:     Application startup complete.'\nexec sleep 30",
        0o755,
    );

    let started = supervisor().start(&launch(program)).await.unwrap();
    assert_eq!(started.readiness.signal, ReadinessSignal::OutputMatched);

    let env = fs::read_to_string(dir.path().join("env.txt")).unwrap();
    assert_eq!(env.trim(), "true:8400");
    let cwd = fs::read_to_string(dir.path().join("cwd.txt")).unwrap();
    assert_eq!(
        fs::canonicalize(cwd.trim()).unwrap(),
        fs::canonicalize(dir.path()).unwrap()
    );

    let mut handle = started.handle;
    ShutdownCoordinator::default().stop(&mut handle).await;
}

#[tokio::test]
async fn backend_ignoring_sigterm_is_force_killed() {
    let dir = TempDir::new().unwrap();
    let program = write_script(
        dir.path(),
        "trap '' TERM\necho 'Uvicorn running'\nwhile true; do sleep 1; done",
        0o755,
    );

    let started = supervisor().start(&launch(program)).await.unwrap();
    let mut handle = started.handle;
    let outcome = ShutdownCoordinator::new(Duration::from_millis(300))
        .stop(&mut handle)
        .await;

    match outcome {
        ShutdownOutcome::Forced(Some(report)) => assert_eq!(report.code, None),
        other => panic!("expected a forced kill, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_executable_is_not_found() {
    let dir = TempDir::new().unwrap();

    let err = supervisor()
        .start(&launch(dir.path().join("bracket-backend")))
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::ExecutableNotFound { .. }));
}

#[tokio::test]
async fn non_executable_file_is_a_spawn_error() {
    let dir = TempDir::new().unwrap();
    let program = write_script(dir.path(), "echo 'Uvicorn running'", 0o644);

    let err = supervisor().start(&launch(program)).await.unwrap_err();

    assert!(matches!(err, LifecycleError::SpawnError { .. }), "{err:?}");
    assert!(err.to_string().contains("bracket-backend"));
}
