//! Fatal error reporting port.

/// Last line of defence for fatal lifecycle failures.
///
/// `report` is synchronous and blocks until the user has acknowledged the
/// message. Callers on an async runtime must run it on a blocking thread.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, title: &str, message: &str);
}

