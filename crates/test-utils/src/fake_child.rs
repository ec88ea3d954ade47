use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use apex_ls_mcp::supervise::{ChildHandle, ChildStatus, ForwardedSignal, Launcher, SignalSource};

/// How a fake child reacts to a forwarded signal.
#[derive(Debug, Clone, Copy)]
pub enum OnSignal {
    /// Record it and keep running until told to exit.
    Ignore,
    /// Die from the signal, like a process with default dispositions.
    Die,
    /// Catch it and exit with the given code.
    ExitWith(i32),
}

/// Test-side view of everything a [`FakeLauncher`] did.
#[derive(Clone)]
pub struct FakeChildControl {
    forwarded: Arc<Mutex<Vec<ForwardedSignal>>>,
    launched: Arc<Mutex<Vec<(OsString, Vec<OsString>)>>>,
    exit_tx: mpsc::UnboundedSender<ChildStatus>,
}

impl FakeChildControl {
    /// Signals the child received, in order.
    pub fn forwarded(&self) -> Vec<ForwardedSignal> {
        self.forwarded.lock().unwrap().clone()
    }

    /// Every `(program, args)` the launcher was asked to start.
    pub fn launched(&self) -> Vec<(OsString, Vec<OsString>)> {
        self.launched.lock().unwrap().clone()
    }

    /// Make the child exit with `status`.
    pub fn exit(&self, status: ChildStatus) {
        let _ = self.exit_tx.send(status);
    }
}

/// A launcher that hands out one scripted [`FakeChild`].
pub struct FakeLauncher {
    on_signal: OnSignal,
    fail_with: Option<io::ErrorKind>,
    control: FakeChildControl,
    exit_rx: Option<mpsc::UnboundedReceiver<ChildStatus>>,
}

impl FakeLauncher {
    pub fn new(on_signal: OnSignal) -> (Self, FakeChildControl) {
        let (exit_tx, exit_rx) = mpsc::unbounded_channel();
        let control = FakeChildControl {
            forwarded: Arc::new(Mutex::new(Vec::new())),
            launched: Arc::new(Mutex::new(Vec::new())),
            exit_tx,
        };
        let launcher = Self {
            on_signal,
            fail_with: None,
            control: control.clone(),
            exit_rx: Some(exit_rx),
        };
        (launcher, control)
    }

    /// A launcher whose every launch fails with `kind`.
    pub fn failing(kind: io::ErrorKind) -> (Self, FakeChildControl) {
        let (mut launcher, control) = Self::new(OnSignal::Ignore);
        launcher.fail_with = Some(kind);
        (launcher, control)
    }
}

impl Launcher for FakeLauncher {
    fn launch(&mut self, program: &OsStr, args: &[OsString]) -> io::Result<Box<dyn ChildHandle>> {
        self.control
            .launched
            .lock()
            .unwrap()
            .push((program.to_os_string(), args.to_vec()));

        if let Some(kind) = self.fail_with {
            return Err(io::Error::new(kind, "fake launch failure"));
        }

        let exit_rx = self
            .exit_rx
            .take()
            .ok_or_else(|| io::Error::other("fake launcher supports a single child"))?;

        Ok(Box::new(FakeChild {
            on_signal: self.on_signal,
            forwarded: Arc::clone(&self.control.forwarded),
            exit_tx: self.control.exit_tx.clone(),
            exit_rx,
        }))
    }
}

/// A child process that only exists in memory.
pub struct FakeChild {
    on_signal: OnSignal,
    forwarded: Arc<Mutex<Vec<ForwardedSignal>>>,
    exit_tx: mpsc::UnboundedSender<ChildStatus>,
    exit_rx: mpsc::UnboundedReceiver<ChildStatus>,
}

impl ChildHandle for FakeChild {
    fn id(&self) -> Option<u32> {
        Some(4242)
    }

    fn send_signal(&mut self, signal: ForwardedSignal) -> io::Result<()> {
        self.forwarded.lock().unwrap().push(signal);
        match self.on_signal {
            OnSignal::Ignore => {}
            OnSignal::Die => {
                let _ = self.exit_tx.send(ChildStatus::signaled(signal.number()));
            }
            OnSignal::ExitWith(code) => {
                let _ = self.exit_tx.send(ChildStatus::exited(code));
            }
        }
        Ok(())
    }

    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ChildStatus>> + Send + '_>> {
        Box::pin(async move {
            self.exit_rx
                .recv()
                .await
                .ok_or_else(|| io::Error::other("fake child exit channel closed"))
        })
    }
}

/// Signal source fed by the test through an mpsc sender.
pub struct ScriptedSignals {
    rx: mpsc::UnboundedReceiver<ForwardedSignal>,
}

impl ScriptedSignals {
    pub fn new() -> (Self, mpsc::UnboundedSender<ForwardedSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }
}

impl SignalSource for ScriptedSignals {
    fn recv(&mut self) -> Pin<Box<dyn Future<Output = Option<ForwardedSignal>> + Send + '_>> {
        Box::pin(async move { self.rx.recv().await })
    }
}
