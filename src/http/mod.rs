//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → TraceLayer (request span)
//!     → gate.rs (reject with 502 once draining)
//!     → handler
//! ```

pub mod gate;
pub mod response;
pub mod server;

pub use gate::AdmissionGate;
pub use server::HttpServer;
