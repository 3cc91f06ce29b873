//! Menu event handling.

use tauri::menu::MenuEvent;
use tauri::{AppHandle, Manager, WebviewWindow};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tracing::{debug, warn};

use super::{MenuAction, action_for};
use crate::app::{MAIN_WINDOW, ShellState};

const ZOOM_STEP: f64 = 0.1;

/// Handle menu item click events.
pub fn handle_menu_event(app: &AppHandle, event: MenuEvent) {
    let id = event.id().as_ref();
    debug!(menu_id = %id, "Menu event received");

    let Some(action) = action_for(id) else {
        warn!(menu_id = %id, "Unknown menu item");
        return;
    };

    match action {
        MenuAction::Quit => {
            let state = app.state::<ShellState>();
            state.controller.quit();
        }
        MenuAction::OpenExternal(url) => {
            if let Err(e) = open::that(url) {
                warn!(%url, error = %e, "Failed to open external link");
            }
        }
        MenuAction::About => show_about(app),
        action => {
            // Everything else acts on the main window, which may be closed
            let Some(window) = app.get_webview_window(MAIN_WINDOW) else {
                debug!(?action, "No main window, ignoring menu action");
                return;
            };
            if let Err(e) = apply_to_window(app, &window, action) {
                warn!(?action, error = %e, "Menu action failed");
            }
        }
    }
}

fn apply_to_window(
    app: &AppHandle,
    window: &WebviewWindow,
    action: MenuAction,
) -> Result<(), tauri::Error> {
    match action {
        MenuAction::Navigate(path) => window.eval(&format!("window.location.href = '{path}';")),
        MenuAction::Reload | MenuAction::ForceReload => window.eval("window.location.reload();"),
        MenuAction::ToggleDevTools => {
            if window.is_devtools_open() {
                window.close_devtools();
            } else {
                window.open_devtools();
            }
            Ok(())
        }
        MenuAction::ResetZoom => window.set_zoom(app.state::<ShellState>().set_zoom(1.0)),
        MenuAction::ZoomIn => window.set_zoom(app.state::<ShellState>().adjust_zoom(ZOOM_STEP)),
        MenuAction::ZoomOut => window.set_zoom(app.state::<ShellState>().adjust_zoom(-ZOOM_STEP)),
        MenuAction::ToggleFullscreen => window.set_fullscreen(!window.is_fullscreen()?),
        MenuAction::Quit | MenuAction::OpenExternal(_) | MenuAction::About => Ok(()),
    }
}

fn show_about(app: &AppHandle) {
    let detail = format!(
        "Version: {} ({})\nDesktop Edition\n\nA self-hosted tournament management system\nBuilt with FastAPI, Next.js, and Tauri\n\nLicense: AGPL-3.0",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH"),
    );
    app.dialog()
        .message(detail)
        .title("About Bracket Tournament System")
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}
