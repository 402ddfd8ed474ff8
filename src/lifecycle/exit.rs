//! Process termination.
//!
//! The drained path and the grace-period path race each other. [`ExitLatch`]
//! lets exactly one of them through; the loser becomes a no-op even when the
//! exit hook does not actually end the process (as in tests).

use std::sync::atomic::{AtomicBool, Ordering};

/// How the shutdown episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Listener closed every connection within the grace period.
    Drained,
    /// Grace period elapsed first.
    Forced,
}

impl ShutdownOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            ShutdownOutcome::Drained => 0,
            ShutdownOutcome::Forced => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShutdownOutcome::Drained => "drained",
            ShutdownOutcome::Forced => "forced",
        }
    }
}

/// Terminates the process with a status code.
pub trait ProcessExit: Send + Sync + 'static {
    fn exit(&self, code: i32);
}

/// Exits through [`std::process::exit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdProcessExit;

impl ProcessExit for StdProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code)
    }
}

/// One-time-trip latch shared by the two exit paths.
#[derive(Debug, Default)]
pub struct ExitLatch {
    tripped: AtomicBool,
}

impl ExitLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for the first caller only.
    pub fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::AcqRel)
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }
}
