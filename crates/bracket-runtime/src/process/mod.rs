//! Backend process infrastructure.
//!
//! # Structure
//!
//! - `ProcessSpawner` / `TokioProcessSpawner` - create the child with piped stdio
//! - `ProcessSignaller` - graceful and forceful termination primitives
//! - `ProcessHandle` - the single live backend: pid, streams, exit status, termination flag
//! - `spawn_stream_reader` - line readers feeding logs and the readiness latch
//!
//! Each spawned child is owned by an exit-waiter task. The waiter publishes
//! the exit on a `watch` channel and executes forced kills, so nothing else
//! ever needs mutable access to the `Child`.

mod handle;
mod signal;
mod spawn;
mod stream;

pub use handle::ProcessHandle;
pub use signal::{ChildSignaller, ProcessSignaller};
pub use spawn::{LaunchSpec, OutputStream, ProcessSpawner, SpawnedProcess, TokioProcessSpawner};
pub(crate) use stream::{StreamKind, spawn_stream_reader};

#[cfg(test)]
pub(crate) use spawn::MockProcessSpawner;
