//! Backend readiness detection.
//!
//! Three independent signals race; the first to complete decides:
//!
//! - `OutputLatch` / `OutputMatch` - a startup marker on the backend's stdout
//! - `poll_health` - bounded HTTP polling of the health endpoint (fail-open)
//! - the hard startup timeout
//!
//! `ReadinessProbe::resolve` runs the race.

mod health;
mod latch;
mod probe;

pub use health::{HealthCheck, HealthCheckError, HealthPollOutcome, HttpHealthCheck, poll_health};
pub use latch::{OutputLatch, OutputMatch, output_latch};
pub use probe::ReadinessProbe;
