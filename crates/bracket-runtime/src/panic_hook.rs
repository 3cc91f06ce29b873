//! Panic logging shared by the composition roots.

use bracket_core::LifecycleError;
use tracing::error;

/// Log panics as unhandled runtime errors before the previous hook runs.
///
/// The previous hook is chained, so the usual panic message and unwinding
/// are unchanged.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let err = LifecycleError::UnhandledRuntime(info.to_string());
        error!(error = %err, "Uncaught panic");
        previous(info);
    }));
}
