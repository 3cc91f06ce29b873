//! The application lifecycle controller.
//!
//! A single task owns the lifecycle state, the backend `ProcessHandle` and
//! the window flag. Shell events arrive as `ControlCommand`s, backend exits
//! through the handle's exit watch. Each event is handled to completion
//! before the next one is looked at, so none of the owned state is shared.

use std::path::PathBuf;
use std::sync::Arc;

use bracket_core::{
    ConfigError, DesktopConfig, ErrorReporter, ExitReport, LifecycleError, LifecycleMachine,
    LifecycleState, ReadinessOutcome, WindowSurface,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::process::{LaunchSpec, ProcessHandle, ProcessSpawner};
use crate::readiness::{HealthCheck, ReadinessProbe};
use crate::shutdown::ShutdownCoordinator;
use crate::supervisor::{PendingBackend, ProcessSupervisor};
use crate::window::{WindowCreation, WindowHost};

/// Events delivered by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// The user re-activated the application (dock click, second launch).
    Activate,
    /// The application window was closed.
    WindowClosed,
    /// The application is about to exit.
    Quit,
}

/// Cloneable sender side of the controller's command channel.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<ControlCommand>,
}

impl ControllerHandle {
    /// Queue `command`. Returns `false` once the controller has finished.
    pub fn send(&self, command: ControlCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn activate(&self) -> bool {
        self.send(ControlCommand::Activate)
    }

    pub fn window_closed(&self) -> bool {
        self.send(ControlCommand::WindowClosed)
    }

    pub fn quit(&self) -> bool {
        self.send(ControlCommand::Quit)
    }
}

/// Adapters the controller talks to.
pub struct LifecycleDeps {
    pub spawner: Arc<dyn ProcessSpawner>,
    pub health: Arc<dyn HealthCheck>,
    pub surface: Arc<dyn WindowSurface>,
    pub reporter: Arc<dyn ErrorReporter>,
}

/// Summary returned when the controller finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleReport {
    pub final_state: LifecycleState,
    /// Number of modals actually shown.
    pub errors_reported: u32,
    /// Number of startup cycles run.
    pub cycles: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

enum Startup {
    Ready(ReadinessOutcome),
    Exited(ExitReport),
    Quit,
}

/// Sequential owner of the backend and window lifecycle.
pub struct LifecycleController {
    config: DesktopConfig,
    launch: LaunchSpec,
    target_url: Url,
    machine: LifecycleMachine,
    supervisor: ProcessSupervisor,
    shutdown: ShutdownCoordinator,
    window: WindowHost,
    reporter: Arc<dyn ErrorReporter>,
    backend: Option<ProcessHandle>,
    commands: mpsc::UnboundedReceiver<ControlCommand>,
    errors_reported: u32,
}

impl LifecycleController {
    /// Build a controller for the backend at `executable`.
    ///
    /// The executable is not checked here; a missing one surfaces as
    /// `ExecutableNotFound` when the first cycle starts.
    pub fn new(
        config: DesktopConfig,
        executable: PathBuf,
        deps: LifecycleDeps,
    ) -> Result<(Self, ControllerHandle), ConfigError> {
        config.validate()?;
        let target_url = config.target_url()?;
        let launch = LaunchSpec::for_executable(executable, config.backend_env());
        let probe = ReadinessProbe::new(config.readiness.clone(), deps.health);
        let (tx, commands) = mpsc::unbounded_channel();

        let controller = Self {
            launch,
            target_url,
            machine: LifecycleMachine::new(),
            supervisor: ProcessSupervisor::new(deps.spawner, probe),
            shutdown: ShutdownCoordinator::new(config.shutdown_grace),
            window: WindowHost::new(deps.surface),
            reporter: deps.reporter,
            backend: None,
            commands,
            errors_reported: 0,
            config,
        };
        Ok((controller, ControllerHandle { tx }))
    }

    pub const fn state(&self) -> LifecycleState {
        self.machine.state()
    }

    /// Run the initial startup cycle, then process events until quit.
    pub async fn run(mut self) -> LifecycleReport {
        info!(
            mode = ?self.config.mode,
            port = self.config.port,
            executable = %self.launch.program().display(),
            "Starting Bracket Tournament System"
        );

        let mut flow = self.start_cycle().await;
        while flow == Flow::Continue {
            if self.nothing_left_to_host() {
                info!("Startup failed and no window is open, exiting");
                break;
            }

            flow = tokio::select! {
                biased;

                report = backend_exit(self.backend.as_mut()) => {
                    self.on_backend_exit(report).await;
                    Flow::Continue
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("all controller handles dropped");
                        self.quit().await
                    }
                },
            };
        }

        let report = LifecycleReport {
            final_state: self.machine.state(),
            errors_reported: self.errors_reported,
            cycles: self.machine.cycle(),
        };
        info!(
            state = %report.final_state,
            errors_reported = report.errors_reported,
            "Lifecycle controller finished"
        );
        report
    }

    async fn handle_command(&mut self, command: ControlCommand) -> Flow {
        debug!(?command, state = %self.machine.state(), "handling command");
        match command {
            ControlCommand::Activate => self.activate().await,
            ControlCommand::WindowClosed => {
                self.window.mark_closed();
                if self.config.quit_on_last_window_closed {
                    self.quit().await
                } else {
                    Flow::Continue
                }
            }
            ControlCommand::Quit => self.quit().await,
        }
    }

    /// Spawn, probe and open the window.
    async fn start_cycle(&mut self) -> Flow {
        if let Err(e) = self.machine.begin_cycle() {
            self.runtime_error("Cannot begin startup cycle", &e.to_string());
            return Flow::Continue;
        }
        info!(cycle = self.machine.cycle(), "Starting backend server");

        let PendingBackend { handle, output } = match self.supervisor.spawn(&self.launch) {
            Ok(pending) => pending,
            Err(e) => {
                self.fail(e).await;
                return Flow::Continue;
            }
        };
        self.backend = Some(handle);
        self.advance(LifecycleState::Probing);

        let probe = self.supervisor.probe().clone();
        let readiness = probe.resolve(output);
        tokio::pin!(readiness);

        let startup = loop {
            tokio::select! {
                biased;

                report = backend_exit(self.backend.as_mut()) => break Startup::Exited(report),
                command = self.commands.recv() => match command {
                    Some(ControlCommand::Quit) | None => break Startup::Quit,
                    Some(command) => debug!(?command, "ignoring command while backend is starting"),
                },
                outcome = &mut readiness => break Startup::Ready(outcome),
            }
        };

        match startup {
            Startup::Ready(outcome) => {
                debug!(signal = ?outcome.signal, elapsed = ?outcome.elapsed, "readiness resolved");
                self.advance(LifecycleState::Ready);
                self.open_window();
                Flow::Continue
            }
            Startup::Exited(report) => {
                self.on_backend_exit(report).await;
                Flow::Continue
            }
            Startup::Quit => self.quit().await,
        }
    }

    /// Show the window again, restarting the backend if it is gone.
    async fn activate(&mut self) -> Flow {
        if self.window.is_open() {
            debug!("activate ignored: window already open");
            return Flow::Continue;
        }
        // An exit published after the loop last polled it must be reported
        // before the handle is replaced
        if let Some(report) = self.backend.as_ref().and_then(ProcessHandle::exit_report) {
            self.on_backend_exit(report).await;
        }
        if self.backend_alive() {
            self.open_window();
            Flow::Continue
        } else {
            info!("No backend running, re-running startup");
            self.start_cycle().await
        }
    }

    fn open_window(&mut self) {
        match self.window.create(&self.target_url) {
            Ok(WindowCreation::Created) => {
                if self.machine.state() == LifecycleState::Ready {
                    self.advance(LifecycleState::Running);
                }
                info!("Application initialized successfully");
            }
            Ok(WindowCreation::AlreadyOpen) => {}
            Err(e) => self.runtime_error("Failed to create application window", &e.to_string()),
        }
    }

    async fn on_backend_exit(&mut self, report: ExitReport) {
        let Some(handle) = self.backend.take() else {
            return;
        };

        if handle.termination_requested() {
            info!(pid = ?handle.pid(), %report, "Backend exited after termination request");
            return;
        }

        if report.is_success() {
            warn!(pid = ?handle.pid(), state = %self.machine.state(), "Backend exited on its own with code 0");
            if matches!(
                self.machine.state(),
                LifecycleState::Starting | LifecycleState::Probing
            ) {
                self.machine.fail();
            }
            return;
        }

        self.fail(LifecycleError::PrematureExit { code: report.code })
            .await;
    }

    /// Stop the backend (once) and end the event loop.
    async fn quit(&mut self) -> Flow {
        info!(state = %self.machine.state(), "Quit requested");
        if !self.machine.state().is_terminal() {
            self.advance(LifecycleState::ShuttingDown);
        }

        if let Some(mut handle) = self.backend.take() {
            let outcome = self.shutdown.stop(&mut handle).await;
            debug!(?outcome, "backend shutdown finished");
        }

        if self.machine.state() == LifecycleState::ShuttingDown {
            self.advance(LifecycleState::Terminated);
        }
        Flow::Exit
    }

    async fn fail(&mut self, err: LifecycleError) {
        error!(error = %err, state = %self.machine.state(), "Lifecycle failure");
        self.machine.fail();
        self.report(&err).await;
    }

    /// Show the modal for `err`, if it has one, and wait for it to close.
    async fn report(&mut self, err: &LifecycleError) {
        let Some(dialog) = err.dialog() else {
            return;
        };
        let reporter = Arc::clone(&self.reporter);
        match tokio::task::spawn_blocking(move || reporter.report(&dialog.title, &dialog.message))
            .await
        {
            Ok(()) => self.errors_reported += 1,
            Err(e) => self.runtime_error("Error reporter failed", &e.to_string()),
        }
    }

    fn advance(&mut self, next: LifecycleState) {
        if let Err(e) = self.machine.advance(next) {
            self.runtime_error("Lifecycle transition rejected", &e.to_string());
        }
    }

    fn runtime_error(&self, context: &str, detail: &str) {
        let err = LifecycleError::UnhandledRuntime(detail.to_string());
        error!(error = %err, state = %self.machine.state(), "{context}");
    }

    fn backend_alive(&self) -> bool {
        self.backend.as_ref().is_some_and(|h| !h.has_exited())
    }

    fn nothing_left_to_host(&self) -> bool {
        self.config.quit_on_last_window_closed
            && self.machine.state() == LifecycleState::Failed
            && self.backend.is_none()
            && !self.window.is_open()
    }
}

/// Resolve with the backend's exit, or never if there is no backend.
async fn backend_exit(backend: Option<&mut ProcessHandle>) -> ExitReport {
    match backend {
        Some(handle) => handle.wait_for_exit().await,
        None => std::future::pending().await,
    }
}
