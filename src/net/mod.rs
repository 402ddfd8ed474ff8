//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ShutdownController::start
//!     → Listener::listen (bind, spawn accept loop)
//! ShutdownController::handle_signal
//!     → Listener::close (stop accepting, wait for open connections)
//! ```

pub mod listener;

pub use listener::{HttpListener, Listener, ListenerError};
