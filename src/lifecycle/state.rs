//! Shutdown state machine.
//!
//! # States
//! - Running: requests are admitted
//! - Draining: listener closing, new requests rejected
//! - Terminated: an exit path has fired
//!
//! # State Transitions
//! ```text
//! Running → Draining: first termination signal
//! Draining → Terminated: listener drained or grace period elapsed
//! ```
//!
//! There is no edge back to Running.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle state of one serving process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShutdownState {
    Running = 0,
    Draining = 1,
    Terminated = 2,
}

impl ShutdownState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ShutdownState::Running,
            1 => ShutdownState::Draining,
            _ => ShutdownState::Terminated,
        }
    }

    /// Whether new requests should still be admitted.
    pub fn is_running(self) -> bool {
        self == ShutdownState::Running
    }
}

impl fmt::Display for ShutdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownState::Running => "running",
            ShutdownState::Draining => "draining",
            ShutdownState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Shared handle to a controller's [`ShutdownState`].
///
/// Cloning yields another view of the same state. Only the controller moves it
/// forward; everyone else reads.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    state: Arc<AtomicU8>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn get(&self) -> ShutdownState {
        ShutdownState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move Running → Draining. Returns `false` if shutdown had already begun.
    pub(crate) fn begin_draining(&self) -> bool {
        self.state
            .compare_exchange(
                ShutdownState::Running as u8,
                ShutdownState::Draining as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub(crate) fn mark_terminated(&self) {
        self.state
            .store(ShutdownState::Terminated as u8, Ordering::Release);
    }
}
