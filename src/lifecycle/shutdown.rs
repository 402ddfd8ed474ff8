//! Shutdown coordination.
//!
//! [`ShutdownController`] owns the [`ShutdownFlag`], the listener and the exit
//! hook. On the first termination signal it:
//!
//! 1. moves the flag from Running to Draining (later signals stop here)
//! 2. asks the listener to close
//! 3. runs the user callback with the signal
//! 4. spawns a task awaiting the drain, and the grace-period timer
//!
//! Whichever of the drain task and the timer finishes first exits the process
//! (0 for drained, 1 for forced). The other is stopped by the [`ExitLatch`].

use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{self, BoxFuture, FutureExt};
use thiserror::Error;

use crate::config::ServerOptions;
use crate::http::gate::AdmissionGate;
use crate::lifecycle::exit::{ExitLatch, ProcessExit, ShutdownOutcome, StdProcessExit};
use crate::lifecycle::signals::{SignalListener, TerminationSignal};
use crate::lifecycle::startup;
use crate::lifecycle::state::{ShutdownFlag, ShutdownState};
use crate::net::listener::{Listener, ListenerError};
use crate::observability::metrics;

/// Caller-supplied hook run once, with the signal that started the shutdown.
pub type ShutdownCallback = Box<dyn Fn(TerminationSignal) + Send + Sync>;

/// Errors returned by [`ShutdownController::start`].
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("shutdown controller already started")]
    AlreadyStarted,

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to register signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

struct Inner {
    options: ServerOptions,
    flag: ShutdownFlag,
    latch: ExitLatch,
    exit: Box<dyn ProcessExit>,
    on_shutdown: Option<ShutdownCallback>,
    listener: Mutex<Option<Box<dyn Listener>>>,
    started: AtomicBool,
}

/// Builder for [`ShutdownController`].
pub struct ShutdownControllerBuilder {
    options: ServerOptions,
    exit: Box<dyn ProcessExit>,
    on_shutdown: Option<ShutdownCallback>,
}

impl ShutdownControllerBuilder {
    /// Run `callback` with the signal name once shutdown begins.
    pub fn on_shutdown<F>(mut self, callback: F) -> Self
    where
        F: Fn(TerminationSignal) + Send + Sync + 'static,
    {
        self.on_shutdown = Some(Box::new(callback));
        self
    }

    /// Replace the process exit hook.
    pub fn exit_with<E: ProcessExit>(mut self, exit: E) -> Self {
        self.exit = Box::new(exit);
        self
    }

    pub fn build(self) -> ShutdownController {
        ShutdownController {
            inner: Arc::new(Inner {
                options: self.options,
                flag: ShutdownFlag::new(),
                latch: ExitLatch::new(),
                exit: self.exit,
                on_shutdown: self.on_shutdown,
                listener: Mutex::new(None),
                started: AtomicBool::new(false),
            }),
        }
    }
}

/// Coordinator for graceful shutdown of a single listener.
///
/// Cheap to clone; clones drive the same shutdown episode.
#[derive(Clone)]
pub struct ShutdownController {
    inner: Arc<Inner>,
}

impl ShutdownController {
    pub fn builder(options: ServerOptions) -> ShutdownControllerBuilder {
        ShutdownControllerBuilder {
            options,
            exit: Box::new(StdProcessExit),
            on_shutdown: None,
        }
    }

    /// Controller with default exit behavior and no callback.
    pub fn new(options: ServerOptions) -> Self {
        Self::builder(options).build()
    }

    pub fn state(&self) -> ShutdownState {
        self.inner.flag.get()
    }

    /// Shared view of the state, for components that only observe it.
    pub fn flag(&self) -> ShutdownFlag {
        self.inner.flag.clone()
    }

    /// Gate to install in the request pipeline.
    pub fn admission_gate(&self) -> AdmissionGate {
        AdmissionGate::new(self.flag())
    }

    pub fn grace_period(&self) -> Duration {
        self.inner.options.grace_period()
    }

    /// Install signal handlers, bind `listener` and announce readiness.
    ///
    /// Must be called from within a Tokio runtime. Once a call has succeeded,
    /// later calls fail with [`ShutdownError::AlreadyStarted`]; a failed call
    /// leaves the controller startable again.
    pub async fn start<L: Listener>(&self, listener: L) -> Result<SocketAddr, ShutdownError> {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return Err(ShutdownError::AlreadyStarted);
        }

        let result = self.try_start(listener).await;
        if result.is_err() {
            self.inner.started.store(false, Ordering::Release);
        }
        result
    }

    async fn try_start<L: Listener>(&self, mut listener: L) -> Result<SocketAddr, ShutdownError> {
        // Handlers go in before the bind so a signal sent right after the
        // readiness notification is never met by the default action.
        let mut signals = SignalListener::register().map_err(ShutdownError::Signals)?;

        let options = &self.inner.options;
        let addr = listener.listen(options.port(), options.host.clone()).await?;
        *self.lock_listener() = Some(Box::new(listener));

        let controller = self.clone();
        tokio::spawn(async move {
            while let Some(signal) = signals.recv().await {
                controller.handle_signal(signal);
            }
        });
        tracing::debug!(
            grace_period_ms = options.timeout,
            "Termination signal handlers installed"
        );

        startup::announce_ready(options, addr.port()).await;
        Ok(addr)
    }

    /// React to a termination signal.
    ///
    /// Only the first call does anything. It never blocks: the drain wait and
    /// the grace timer run as spawned tasks, so a Tokio runtime is required.
    pub fn handle_signal(&self, signal: TerminationSignal) {
        if !self.inner.flag.begin_draining() {
            tracing::debug!(signal = %signal, "Shutdown already in progress, ignoring signal");
            return;
        }

        tracing::info!(signal = %signal, "Received {signal}, shutting down.");
        metrics::record_signal(signal);

        let closed = self.close_listener();
        self.run_callback(signal);

        // Spawned after the callback so an already idle listener cannot exit
        // the process before the callback has run.
        let controller = self.clone();
        tokio::spawn(async move {
            closed.await;
            controller.finish(ShutdownOutcome::Drained);
        });

        let grace_period = self.grace_period();
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace_period).await;
            controller.finish(ShutdownOutcome::Forced);
        });
    }

    fn close_listener(&self) -> BoxFuture<'static, ()> {
        match self.lock_listener().as_mut() {
            Some(listener) => listener.close(),
            None => {
                tracing::warn!("Shutdown requested before a listener was started");
                future::ready(()).boxed()
            }
        }
    }

    fn run_callback(&self, signal: TerminationSignal) {
        let Some(callback) = &self.inner.on_shutdown else {
            return;
        };

        if catch_unwind(AssertUnwindSafe(|| callback(signal))).is_err() {
            tracing::error!(signal = %signal, "Shutdown callback panicked");
        }
    }

    fn finish(&self, outcome: ShutdownOutcome) {
        if !self.inner.latch.trip() {
            tracing::trace!(outcome = outcome.as_str(), "Process already exiting");
            return;
        }

        self.inner.flag.mark_terminated();
        match outcome {
            ShutdownOutcome::Drained => {
                tracing::info!("Closed remaining connections.");
            }
            ShutdownOutcome::Forced => {
                tracing::warn!(
                    grace_period_ms = self.inner.options.timeout,
                    "Couldn't close connections in time, forcefully shutting down."
                );
            }
        }
        metrics::record_outcome(outcome);

        self.inner.exit.exit(outcome.exit_code());
    }

    fn lock_listener(&self) -> std::sync::MutexGuard<'_, Option<Box<dyn Listener>>> {
        // A poisoned lock still holds a usable listener.
        self.inner
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
