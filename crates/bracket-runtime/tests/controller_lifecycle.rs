//! End-to-end controller runs against a scripted backend.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bracket_core::{
    DesktopConfig, ErrorReporter, LifecycleState, RunMode, WindowError, WindowSurface,
};
use bracket_runtime::{
    HealthCheck, HealthCheckError, LifecycleController, LifecycleDeps, TokioProcessSpawner,
};
use tempfile::TempDir;
use tokio::sync::Notify;
use url::Url;

struct Unreachable;

#[async_trait]
impl HealthCheck for Unreachable {
    async fn check(&self) -> Result<(), HealthCheckError> {
        Err(HealthCheckError::Status(503))
    }
}

#[derive(Default)]
struct Surface {
    opened: AtomicU32,
    urls: Mutex<Vec<Url>>,
    notify: Notify,
}

impl WindowSurface for Surface {
    fn open(&self, url: &Url) -> Result<(), WindowError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());
        self.notify.notify_one();
        Ok(())
    }
}

#[derive(Default)]
struct Reporter {
    titles: Mutex<Vec<String>>,
    notify: Notify,
}

impl ErrorReporter for Reporter {
    fn report(&self, title: &str, _message: &str) {
        self.titles.lock().unwrap().push(title.to_string());
        self.notify.notify_one();
    }
}

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("bracket-backend");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn deps(surface: &Arc<Surface>, reporter: &Arc<Reporter>) -> LifecycleDeps {
    LifecycleDeps {
        spawner: Arc::new(TokioProcessSpawner),
        health: Arc::new(Unreachable),
        surface: Arc::clone(surface) as Arc<dyn WindowSurface>,
        reporter: Arc::clone(reporter) as Arc<dyn ErrorReporter>,
    }
}

fn config() -> DesktopConfig {
    let mut config = DesktopConfig::for_mode(RunMode::Production);
    config.quit_on_last_window_closed = true;
    config
}

#[tokio::test]
async fn crashing_backend_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let program = write_script(dir.path(), "echo 'Uvicorn running'\nsleep 1\nexit 1");
    let surface = Arc::new(Surface::default());
    let reporter = Arc::new(Reporter::default());

    let (controller, handle) =
        LifecycleController::new(config(), program, deps(&surface, &reporter)).unwrap();
    let run = tokio::spawn(controller.run());

    surface.notify.notified().await;
    reporter.notify.notified().await;
    handle.quit();

    let report = run.await.unwrap();
    assert_eq!(report.final_state, LifecycleState::Failed);
    assert_eq!(report.errors_reported, 1);
    assert_eq!(*reporter.titles.lock().unwrap(), vec!["Backend Error".to_string()]);
    assert_eq!(
        surface.urls.lock().unwrap()[0].as_str(),
        "http://localhost:8400/"
    );
}

#[tokio::test]
async fn quit_terminates_without_modal() {
    let dir = TempDir::new().unwrap();
    let program = write_script(dir.path(), "echo 'Application startup complete'\nexec sleep 30");
    let surface = Arc::new(Surface::default());
    let reporter = Arc::new(Reporter::default());

    let (controller, handle) =
        LifecycleController::new(config(), program, deps(&surface, &reporter)).unwrap();
    let run = tokio::spawn(controller.run());

    surface.notify.notified().await;
    handle.window_closed();

    let report = run.await.unwrap();
    assert_eq!(report.final_state, LifecycleState::Terminated);
    assert_eq!(report.errors_reported, 0);
    assert!(reporter.titles.lock().unwrap().is_empty());
    assert_eq!(surface.opened.load(Ordering::SeqCst), 1);
}
