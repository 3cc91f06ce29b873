//! Application lifecycle state machine.
//!
//! One `LifecycleState` is active per startup cycle. Transitions only move
//! forward, except that `Failed` can be entered from any non-terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of the backend-hosting shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    /// Nothing has been started yet.
    #[default]
    Idle,
    /// Executable resolved, child process being spawned.
    Starting,
    /// Child spawned, waiting for the readiness race to resolve.
    Probing,
    /// Readiness resolved, window not yet created.
    Ready,
    /// Window created; steady state.
    Running,
    /// Quit requested, termination in progress.
    ShuttingDown,
    /// Backend stopped after a requested shutdown.
    Terminated,
    /// A fatal lifecycle error occurred.
    Failed,
}

impl LifecycleState {
    /// Whether no further transitions are allowed in this cycle.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Starting => 1,
            Self::Probing => 2,
            Self::Ready => 3,
            Self::Running => 4,
            Self::ShuttingDown => 5,
            Self::Terminated => 6,
            Self::Failed => 7,
        }
    }

    /// Check whether `self -> next` is a legal transition.
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if matches!(next, Self::Failed) {
            return true;
        }
        next.rank() > self.rank()
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Probing => "probing",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal lifecycle transition {from} -> {to}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Holder of the single process-wide `LifecycleState`.
///
/// Owned by the controller; nothing else mutates it.
#[derive(Debug, Default)]
pub struct LifecycleMachine {
    state: LifecycleState,
    cycle: u32,
}

impl LifecycleMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of startup cycles begun so far (0 before the first one).
    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Move to `next`, enforcing forward-only ordering.
    pub fn advance(&mut self, next: LifecycleState) -> Result<LifecycleState, TransitionError> {
        if !self.state.can_transition_to(next) {
            return Err(TransitionError {
                from: self.state,
                to: next,
            });
        }
        let previous = self.state;
        self.state = next;
        tracing::debug!(from = %previous, to = %next, cycle = self.cycle, "lifecycle transition");
        Ok(previous)
    }

    /// Enter `Failed` from any non-terminal state.
    ///
    /// Returns `false` if the machine was already terminal.
    pub fn fail(&mut self) -> bool {
        self.advance(LifecycleState::Failed).is_ok()
    }

    /// Begin a new startup cycle (spawn → probe → window).
    ///
    /// Allowed from `Idle`, from a terminal state, or from `Ready`/`Running`
    /// when the caller has established that no backend is alive anymore.
    pub fn begin_cycle(&mut self) -> Result<(), TransitionError> {
        match self.state {
            LifecycleState::Idle
            | LifecycleState::Ready
            | LifecycleState::Running
            | LifecycleState::Terminated
            | LifecycleState::Failed => {
                self.state = LifecycleState::Starting;
                self.cycle += 1;
                tracing::debug!(cycle = self.cycle, "startup cycle begun");
                Ok(())
            }
            other => Err(TransitionError {
                from: other,
                to: LifecycleState::Starting,
            }),
        }
    }
}
