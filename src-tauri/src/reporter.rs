//! Native modal dialog for fatal errors.

use bracket_core::ErrorReporter;
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

/// Shows fatal errors in a blocking native message box.
pub struct DialogErrorReporter {
    app: AppHandle,
}

impl DialogErrorReporter {
    pub const fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ErrorReporter for DialogErrorReporter {
    // Must not run on the main thread; the controller calls it from the blocking pool
    fn report(&self, title: &str, message: &str) {
        self.app
            .dialog()
            .message(message)
            .title(title)
            .kind(MessageDialogKind::Error)
            .blocking_show();
    }
}
