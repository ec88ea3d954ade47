// src/supervise/core.rs

//! Pure supervisor state machine.
//!
//! `Starting → Running → { ExitedWithCode, ExitedWithSignal, LaunchFailed }`
//!
//! The core consumes [`SupervisorEvent`]s and answers with
//! [`SupervisorCommand`]s for the IO shell to execute. It owns no process,
//! no signal handler and no Tokio types, so exit mapping and signal
//! forwarding are tested without spawning anything.

use std::ffi::OsString;

use tracing::debug;

use super::{ChildStatus, ForwardedSignal, Termination};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorState {
    Starting,
    Running { pid: Option<u32> },
    ExitedWithCode(i32),
    ExitedWithSignal(i32),
    LaunchFailed { not_found: bool, message: String },
}

impl SupervisorState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SupervisorState::ExitedWithCode(_)
                | SupervisorState::ExitedWithSignal(_)
                | SupervisorState::LaunchFailed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    Launched { pid: Option<u32> },
    LaunchFailed { not_found: bool, message: String },
    SignalReceived(ForwardedSignal),
    ChildExited(ChildStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorCommand {
    ForwardSignal(ForwardedSignal),
}

/// What the supervisor knows about its one child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupervisedProcess {
    pub pid: Option<u32>,
    pub args: Vec<OsString>,
    pub exit_code: Option<i32>,
    pub terminating_signal: Option<i32>,
}

#[derive(Debug)]
pub struct SupervisorCore {
    state: SupervisorState,
    process: SupervisedProcess,
    forwarded: Vec<ForwardedSignal>,
}

impl SupervisorCore {
    pub fn new(args: Vec<OsString>) -> Self {
        Self {
            state: SupervisorState::Starting,
            process: SupervisedProcess {
                args,
                ..SupervisedProcess::default()
            },
            forwarded: Vec::new(),
        }
    }

    pub fn state(&self) -> &SupervisorState {
        &self.state
    }

    pub fn process(&self) -> &SupervisedProcess {
        &self.process
    }

    /// Signals handed to the child so far, in order.
    pub fn forwarded(&self) -> &[ForwardedSignal] {
        &self.forwarded
    }

    /// Feed one event; returns the commands the shell must execute.
    pub fn step(&mut self, event: SupervisorEvent) -> Vec<SupervisorCommand> {
        let mut commands = Vec::new();

        let next = match (&self.state, event) {
            (SupervisorState::Starting, SupervisorEvent::Launched { pid }) => {
                self.process.pid = pid;
                Some(SupervisorState::Running { pid })
            }
            (SupervisorState::Starting, SupervisorEvent::LaunchFailed { not_found, message }) => {
                Some(SupervisorState::LaunchFailed { not_found, message })
            }
            (SupervisorState::Running { .. }, SupervisorEvent::SignalReceived(signal)) => {
                self.forwarded.push(signal);
                commands.push(SupervisorCommand::ForwardSignal(signal));
                None
            }
            (SupervisorState::Running { .. }, SupervisorEvent::ChildExited(status)) => {
                self.process.exit_code = status.code;
                self.process.terminating_signal = status.signal;
                Some(exit_state(status))
            }
            (state, event) => {
                debug!(?state, ?event, "supervisor ignoring event");
                None
            }
        };

        if let Some(next) = next {
            self.state = next;
        }

        commands
    }

    /// How the hosting process should end, once the child is gone.
    ///
    /// `None` while the child is still starting or running, and after a
    /// launch failure (the shell reports that as an error instead).
    pub fn termination(&self) -> Option<Termination> {
        match self.state {
            SupervisorState::ExitedWithCode(code) => Some(Termination::Code(code)),
            SupervisorState::ExitedWithSignal(signal) => Some(Termination::Signal(signal)),
            _ => None,
        }
    }
}

/// A signal wins over a code if a status ever carries both.
fn exit_state(status: ChildStatus) -> SupervisorState {
    match (status.signal, status.code) {
        (Some(signal), _) => SupervisorState::ExitedWithSignal(signal),
        (None, Some(code)) => SupervisorState::ExitedWithCode(code),
        (None, None) => SupervisorState::ExitedWithCode(0),
    }
}
