//! CLI entry point.

use std::process::ExitCode;

use bracket_cli::logging::init_tracing;
use bracket_cli::{Cli, CliError, bootstrap};
use bracket_core::{LifecycleError, LifecycleState};
use bracket_runtime::{ControllerHandle, LifecycleReport, install_panic_hook};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so clap sees its values as environment
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let _guard = init_tracing(cli.verbose);
    install_panic_hook();

    match run(&cli).await {
        Ok(report) if report.final_state == LifecycleState::Failed => {
            let err = CliError::Lifecycle(format!(
                "Bracket stopped after a fatal error ({} reported)",
                report.errors_reported
            ));
            error!(error = %err, "Exiting with failure");
            ExitCode::from(err.exit_code())
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed to start");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<LifecycleReport, CliError> {
    let (controller, handle) = bootstrap(cli)?;
    let signals = tokio::spawn(forward_shutdown_signals(handle));

    let report = tokio::spawn(controller.run()).await.map_err(|e| {
        let err = LifecycleError::UnhandledRuntime(e.to_string());
        CliError::Process(err.to_string())
    });

    signals.abort();
    report
}

/// Turn Ctrl-C (and SIGTERM on Unix) into a quit command.
async fn forward_shutdown_signals(handle: ControllerHandle) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
    handle.quit();
}
