// src/supervise/termination.rs

use tracing::debug;

/// How the hosting process must end once the child is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exit with the child's code.
    Code(i32),
    /// Die from the same signal the child died from.
    Signal(i32),
}

impl Termination {
    /// Shell-style numeric equivalent, used only where a signal cannot be raised.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Code(code) => code,
            Termination::Signal(signal) => 128 + signal,
        }
    }

    /// End this process the way the child ended.
    pub fn apply(self) -> ! {
        match self {
            Termination::Code(code) => std::process::exit(code),
            Termination::Signal(signal) => {
                debug!(signal, "re-raising child's terminating signal");
                reraise(signal);
                // Only reached if the signal could not be delivered.
                std::process::exit(self.exit_code())
            }
        }
    }
}

#[cfg(unix)]
fn reraise(signal: i32) {
    use nix::sys::signal::{SigHandler, Signal, raise};

    let Ok(signal) = Signal::try_from(signal) else {
        return;
    };
    // SAFETY: restoring the default disposition installs no Rust handler;
    // the process is about to die from this very signal.
    unsafe {
        let _ = nix::sys::signal::signal(signal, SigHandler::SigDfl);
    }
    let _ = raise(signal);
}

#[cfg(not(unix))]
fn reraise(_signal: i32) {}
