// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod menu;
mod reporter;
mod surface;

use std::sync::Arc;

use app::{MAIN_WINDOW, ShellState};
use bracket_core::LifecycleState;
use bracket_runtime::{
    HttpHealthCheck, LifecycleController, LifecycleDeps, TokioProcessSpawner, install_panic_hook,
};
use dotenvy::dotenv;
use reporter::DialogErrorReporter;
use surface::TauriWindowSurface;
use tauri::Manager;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// Initialize tracing with file appender for persistent logs.
///
/// Logs are written to:
/// - stdout (for console viewing)
/// - {data_dir}/bracket-desktop/logs/bracket-desktop.{date} (daily rotation via tracing-appender)
///
/// Log level is controlled by RUST_LOG environment variable (default: info).
fn init_tracing() -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let log_dir = dirs::data_local_dir()
        .map_or_else(|| std::path::PathBuf::from("logs"), |dir| dir.join("bracket-desktop").join("logs"));

    // Create log directory if it doesn't exist
    let file = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => Some(tracing_appender::non_blocking(
            tracing_appender::rolling::daily(&log_dir, "bracket-desktop"),
        )),
        Err(e) => {
            eprintln!("Failed to create log directory: {}", e);
            None
        }
    };
    let (file_writer, guard) = file.unzip();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Build layered subscriber with both stdout and file output
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
                .with_ansi(false) // No ANSI colors in files
                .compact()
        }))
        .try_init()
        .ok(); // Ignore error if already initialized

    guard
}

fn main() {
    let _ = dotenv();
    let _guard = init_tracing();
    install_panic_hook();

    info!("Starting Bracket Tournament System");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = app::desktop_config();
            let executable = app::backend_executable(app, &config)?;
            let health = HttpHealthCheck::new(config.health_url()?, config.readiness.request_timeout)?;

            let handle = app.handle().clone();
            let deps = LifecycleDeps {
                spawner: Arc::new(TokioProcessSpawner),
                health: Arc::new(health),
                surface: Arc::new(TauriWindowSurface::new(
                    handle.clone(),
                    config.mode.is_development(),
                )),
                reporter: Arc::new(DialogErrorReporter::new(handle.clone())),
            };

            let (controller, controller_handle) = LifecycleController::new(config, executable, deps)?;
            app.manage(ShellState::new(controller_handle));

            match menu::build_app_menu(&handle) {
                Ok(menu) => {
                    if let Err(e) = app.set_menu(menu) {
                        error!(error = %e, "Failed to set app menu");
                    }
                }
                Err(e) => error!(error = %e, "Failed to build app menu"),
            }

            tauri::async_runtime::spawn(async move {
                let report = controller.run().await;
                let code = i32::from(report.final_state == LifecycleState::Failed);
                info!(state = %report.final_state, code, "Lifecycle finished, exiting");
                handle.exit(code);
            });

            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                if window.label() == MAIN_WINDOW {
                    window.state::<ShellState>().controller.window_closed();
                }
            }
        })
        .on_menu_event(menu::handlers::handle_menu_event)
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Error while building tauri application");
            std::process::exit(1);
        }
    };

    app.run(|app_handle, event| match event {
        // Exits requested by the controller carry a code; everything else
        // (Cmd+Q, last window closed) goes through the controller first
        tauri::RunEvent::ExitRequested { code: None, api, .. } => {
            api.prevent_exit();
            if !app_handle.webview_windows().is_empty() {
                info!("App exit requested - performing graceful shutdown");
                app_handle.state::<ShellState>().controller.quit();
            }
        }
        #[cfg(target_os = "macos")]
        tauri::RunEvent::Reopen {
            has_visible_windows: false,
            ..
        } => {
            app_handle.state::<ShellState>().controller.activate();
        }
        tauri::RunEvent::Exit => info!("App exiting"),
        _ => {}
    });
}
