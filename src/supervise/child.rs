// src/supervise/child.rs

//! Launching the runtime and talking to the resulting process.
//!
//! The shell in [`super::runner`] only sees [`Launcher`] and [`ChildHandle`],
//! which keeps the real `tokio::process::Child` swappable for fakes.

use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::io;
use std::pin::Pin;

use tokio::process::{Child, Command};
use tracing::debug;

use super::{ChildStatus, ForwardedSignal};

/// A launched child process owned exclusively by the supervisor.
pub trait ChildHandle: Send {
    fn id(&self) -> Option<u32>;

    /// Deliver `signal` to the child unchanged.
    fn send_signal(&mut self, signal: ForwardedSignal) -> io::Result<()>;

    /// Wait for the child to exit. Must be safe to drop and call again.
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ChildStatus>> + Send + '_>>;
}

/// Starts child processes.
pub trait Launcher: Send {
    fn launch(&mut self, program: &OsStr, args: &[OsString]) -> io::Result<Box<dyn ChildHandle>>;
}

/// Production launcher: inherits stdin, stdout and stderr untouched.
#[derive(Debug, Clone, Default)]
pub struct CommandLauncher;

impl Launcher for CommandLauncher {
    fn launch(&mut self, program: &OsStr, args: &[OsString]) -> io::Result<Box<dyn ChildHandle>> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let child = cmd.spawn()?;
        debug!(pid = ?child.id(), "spawned child process");
        Ok(Box::new(TokioChild { child }))
    }
}

/// [`ChildHandle`] over a real `tokio::process::Child`.
#[derive(Debug)]
pub struct TokioChild {
    child: Child,
}

impl ChildHandle for TokioChild {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    #[cfg(unix)]
    fn send_signal(&mut self, signal: ForwardedSignal) -> io::Result<()> {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        // `id()` is `None` once the child has been reaped.
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        let signal = Signal::try_from(signal.number()).map_err(io::Error::from)?;
        kill(Pid::from_raw(pid as i32), signal).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn send_signal(&mut self, _signal: ForwardedSignal) -> io::Result<()> {
        self.child.start_kill()
    }

    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ChildStatus>> + Send + '_>> {
        Box::pin(async move {
            let status = self.child.wait().await?;
            Ok(ChildStatus::from(status))
        })
    }
}
