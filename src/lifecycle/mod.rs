//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bind listener → Announce address → Notify supervisor
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → ShutdownController::handle_signal
//!
//! Shutdown (shutdown.rs):
//!     Running → Draining → close listener → user callback
//!     → drained (exit 0) | grace period elapsed (exit 1)
//! ```
//!
//! # Design Decisions
//! - One controller per listener, one shutdown episode per process
//! - State is owned by the controller and shared by handle (state.rs)
//! - The two exit paths are made exclusive by a latch (exit.rs)

pub mod exit;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use exit::{ProcessExit, ShutdownOutcome, StdProcessExit};
pub use shutdown::{ShutdownCallback, ShutdownController, ShutdownControllerBuilder, ShutdownError};
pub use signals::TerminationSignal;
pub use state::{ShutdownFlag, ShutdownState};
