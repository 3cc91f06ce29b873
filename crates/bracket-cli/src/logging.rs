//! Tracing setup for the launcher.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Directory for the rotating log files.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from("logs"),
        |dir| dir.join("bracket-desktop").join("logs"),
    )
}

/// Initialize tracing with stdout and a daily-rotated log file.
///
/// `RUST_LOG` wins; otherwise `info`, or `debug` with `verbose`. The returned
/// guard flushes the file writer and must live until exit.
pub fn init_tracing(verbose: bool) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let dir = log_dir();
    let file = match std::fs::create_dir_all(&dir) {
        Ok(()) => Some(tracing_appender::non_blocking(
            tracing_appender::rolling::daily(&dir, "bracket-desktop"),
        )),
        Err(e) => {
            eprintln!("Failed to create log directory {}: {e}", dir.display());
            None
        }
    };
    let (file_writer, guard) = file.unzip();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .compact(),
        )
        .with(file_writer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .compact()
        }))
        .try_init()
        .ok();

    guard
}
