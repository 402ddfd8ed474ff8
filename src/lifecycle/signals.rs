//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGTERM and SIGINT
//! - Translate deliveries into [`TerminationSignal`] values
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Registration happens eagerly so failures surface at startup
//! - Handlers stay installed for the life of the process; repeated signals are
//!   delivered to the controller, which ignores them once draining

use std::fmt;
use std::io;

/// Signals that start a graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    Terminate,
    Interrupt,
}

impl TerminationSignal {
    pub const ALL: [TerminationSignal; 2] =
        [TerminationSignal::Terminate, TerminationSignal::Interrupt];

    pub fn as_str(self) -> &'static str {
        match self {
            TerminationSignal::Terminate => "SIGTERM",
            TerminationSignal::Interrupt => "SIGINT",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered termination signal streams.
#[cfg(unix)]
pub struct SignalListener {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    /// Install handlers for every [`TerminationSignal`].
    pub fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next delivery. `None` once the streams are closed.
    pub async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::select! {
            received = self.sigterm.recv() => received.map(|_| TerminationSignal::Terminate),
            received = self.sigint.recv() => received.map(|_| TerminationSignal::Interrupt),
        }
    }
}

#[cfg(not(unix))]
pub struct SignalListener {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(not(unix))]
impl SignalListener {
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    pub async fn recv(&mut self) -> Option<TerminationSignal> {
        self.ctrl_c.recv().await.map(|_| TerminationSignal::Interrupt)
    }
}
