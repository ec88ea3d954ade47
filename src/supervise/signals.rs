// src/supervise/signals.rs

use std::future::Future;
use std::io;
use std::pin::Pin;

use super::ForwardedSignal;

/// Source of interruption/termination requests aimed at the supervisor.
///
/// `recv` resolves to `None` once the source can never yield again; the
/// supervisor then simply keeps waiting for the child.
pub trait SignalSource: Send {
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = Option<ForwardedSignal>> + Send + '_>>;
}

/// SIGINT and SIGTERM delivered to this process.
///
/// Creating it installs the handlers, which also stops those signals from
/// killing the launcher directly.
#[cfg(unix)]
#[derive(Debug)]
pub struct OsSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl OsSignals {
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }
}

#[cfg(unix)]
impl SignalSource for OsSignals {
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = Option<ForwardedSignal>> + Send + '_>> {
        Box::pin(async move {
            tokio::select! {
                Some(()) = self.interrupt.recv() => Some(ForwardedSignal::Interrupt),
                Some(()) = self.terminate.recv() => Some(ForwardedSignal::Terminate),
                else => None,
            }
        })
    }
}

/// Ctrl-C only; there is no SIGTERM to catch outside unix.
#[cfg(not(unix))]
#[derive(Debug, Default)]
pub struct OsSignals;

#[cfg(not(unix))]
impl OsSignals {
    pub fn install() -> io::Result<Self> {
        Ok(Self)
    }
}

#[cfg(not(unix))]
impl SignalSource for OsSignals {
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = Option<ForwardedSignal>> + Send + '_>> {
        Box::pin(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => Some(ForwardedSignal::Interrupt),
                Err(_) => None,
            }
        })
    }
}
