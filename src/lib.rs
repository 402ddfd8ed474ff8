//! Graceful shutdown for a single HTTP listener.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::{AppConfig, ServerOptions};
pub use http::{AdmissionGate, HttpServer};
pub use lifecycle::{ShutdownController, ShutdownState, TerminationSignal};
