//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)  +  CLI overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → ServerOptions handed to the shutdown controller at start
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the controller has started
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, ObservabilityConfig, ServerAddress, ServerOptions};
