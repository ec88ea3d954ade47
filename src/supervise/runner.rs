// src/supervise/runner.rs

use std::ffi::{OsStr, OsString};
use std::io;

use tracing::{debug, info, warn};

use crate::errors::{LauncherError, Result};

use super::child::{ChildHandle, Launcher};
use super::core::{SupervisorCommand, SupervisorCore, SupervisorEvent};
use super::signals::SignalSource;
use super::Termination;

/// Drives a [`SupervisorCore`] with a real or fake child and signal source.
///
/// This is the IO shell: it launches the child, waits for either the child's
/// exit or an incoming signal, and executes whatever the core asks for. It
/// never ends the hosting process itself; see [`Termination::apply`].
pub struct Supervisor<L: Launcher, S: SignalSource> {
    launcher: L,
    signals: S,
}

impl<L: Launcher, S: SignalSource> Supervisor<L, S> {
    pub fn new(launcher: L, signals: S) -> Self {
        Self { launcher, signals }
    }

    /// Launch `program` with `args` and wait for it to finish.
    ///
    /// Every signal received meanwhile is forwarded to the child; the child's
    /// own exit decides the returned [`Termination`].
    pub async fn supervise(&mut self, program: &OsStr, args: &[OsString]) -> Result<Termination> {
        let (termination, _core) = self.supervise_with_core(program, args).await?;
        Ok(termination)
    }

    /// Supervise, then end this process the way the child ended.
    ///
    /// Never returns once the child has been launched; the returned error is
    /// always a launch (or wait) failure.
    pub async fn run(&mut self, program: &OsStr, args: &[OsString]) -> LauncherError {
        match self.supervise(program, args).await {
            Ok(termination) => termination.apply(),
            Err(err) => err,
        }
    }

    /// Like [`supervise`](Self::supervise), also handing back the final core state.
    pub async fn supervise_with_core(
        &mut self,
        program: &OsStr,
        args: &[OsString],
    ) -> Result<(Termination, SupervisorCore)> {
        let mut core = SupervisorCore::new(args.to_vec());

        let mut child = match self.launcher.launch(program, args) {
            Ok(child) => child,
            Err(source) => {
                core.step(SupervisorEvent::LaunchFailed {
                    not_found: source.kind() == io::ErrorKind::NotFound,
                    message: source.to_string(),
                });
                return Err(LauncherError::LaunchFailed {
                    program: program.to_string_lossy().into_owned(),
                    required: None,
                    source,
                });
            }
        };

        let pid = child.id();
        core.step(SupervisorEvent::Launched { pid });
        info!(?pid, program = %program.to_string_lossy(), "child process running");

        let mut signals_open = true;
        loop {
            tokio::select! {
                status = child.wait() => {
                    let status = status?;
                    debug!(?status, "child process exited");
                    core.step(SupervisorEvent::ChildExited(status));
                    break;
                }
                received = self.signals.recv(), if signals_open => {
                    match received {
                        Some(signal) => {
                            info!(signal = signal.name(), "forwarding signal to child");
                            let commands = core.step(SupervisorEvent::SignalReceived(signal));
                            execute(commands, child.as_mut());
                        }
                        None => {
                            debug!("signal source closed; waiting for child only");
                            signals_open = false;
                        }
                    }
                }
            }
        }

        match core.termination() {
            Some(termination) => Ok((termination, core)),
            None => Err(anyhow::anyhow!(
                "supervisor finished in non-terminal state {:?}",
                core.state()
            )
            .into()),
        }
    }
}

fn execute(commands: Vec<SupervisorCommand>, child: &mut dyn ChildHandle) {
    for command in commands {
        match command {
            SupervisorCommand::ForwardSignal(signal) => {
                // The child may already be exiting; its wait() result still decides.
                if let Err(e) = child.send_signal(signal) {
                    warn!(signal = signal.name(), error = %e, "failed to forward signal to child");
                }
            }
        }
    }
}
