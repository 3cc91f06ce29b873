//! Backend process supervision and application lifecycle.
//!
//! The pieces, leaf first:
//!
//! - [`process`] - spawning, stream readers, termination signals, `ProcessHandle`
//! - [`readiness`] - output latch, HTTP health polling, the readiness race
//! - [`supervisor`] - `ProcessSupervisor`: executable check, spawn, readiness
//! - [`shutdown`] - `ShutdownCoordinator`: graceful then forced termination
//! - [`window`] - `WindowHost`: single-window bookkeeping over a `WindowSurface`
//! - [`controller`] - `LifecycleController`: the sequential event loop tying it together
//! - [`panic_hook`] - panic logging for the binaries

pub mod controller;
pub mod panic_hook;
pub mod process;
pub mod readiness;
pub mod shutdown;
pub mod supervisor;
pub mod window;

pub use controller::{
    ControlCommand, ControllerHandle, LifecycleController, LifecycleDeps, LifecycleReport,
};
pub use panic_hook::install_panic_hook;
pub use process::{
    LaunchSpec, ProcessHandle, ProcessSignaller, ProcessSpawner, SpawnedProcess,
    TokioProcessSpawner,
};
pub use readiness::{
    HealthCheck, HealthCheckError, HealthPollOutcome, HttpHealthCheck, OutputLatch, OutputMatch,
    ReadinessProbe, output_latch, poll_health,
};
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome};
pub use supervisor::{PendingBackend, ProcessSupervisor, StartedBackend};
pub use window::{ApplicationWindow, WindowCreation, WindowHost};
