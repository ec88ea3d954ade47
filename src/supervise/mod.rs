// src/supervise/mod.rs

//! Child-process supervision.
//!
//! - [`core`] holds the pure state machine and exit mapping.
//! - [`child`] abstracts the launched process behind [`ChildHandle`] so tests
//!   can inject fakes; [`CommandLauncher`] is the production launcher.
//! - [`signals`] abstracts where SIGINT/SIGTERM come from.
//! - [`runner`] is the async shell that drives the core.
//! - [`termination`] turns the final verdict into this process's own exit.

pub mod child;
pub mod core;
pub mod runner;
pub mod signals;
pub mod termination;

pub use child::{ChildHandle, CommandLauncher, Launcher};
pub use core::{
    SupervisedProcess, SupervisorCommand, SupervisorCore, SupervisorEvent, SupervisorState,
};
pub use runner::Supervisor;
pub use signals::{OsSignals, SignalSource};
pub use termination::Termination;

/// POSIX interrupt signal number.
pub const SIGINT: i32 = 2;
/// POSIX termination signal number.
pub const SIGTERM: i32 = 15;

/// Signals the supervisor listens for and hands to the child verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardedSignal {
    Interrupt,
    Terminate,
}

impl ForwardedSignal {
    pub fn number(self) -> i32 {
        match self {
            ForwardedSignal::Interrupt => SIGINT,
            ForwardedSignal::Terminate => SIGTERM,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ForwardedSignal::Interrupt => "SIGINT",
            ForwardedSignal::Terminate => "SIGTERM",
        }
    }
}

/// How a child ended: an exit code, a terminating signal, or (in theory) neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildStatus {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ChildStatus {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }
}

impl From<std::process::ExitStatus> for ChildStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}
