//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Grace period used when none is configured, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Host shown in the startup announcement when none is configured.
pub const DISPLAY_HOST: &str = "localhost";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener and shutdown options.
    pub server: ServerOptions,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Options consumed when the shutdown controller starts the listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerOptions {
    /// Port to bind. `None` falls back to [`DEFAULT_PORT`]; `Some(0)` lets the OS pick.
    pub port: Option<u16>,

    /// Host to bind. When absent the listener binds all interfaces.
    pub host: Option<String>,

    /// Only selects the scheme shown in the startup announcement.
    pub secure: bool,

    /// Grace period in milliseconds before a forced exit.
    pub timeout: u64,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: None,
            host: None,
            secure: false,
            timeout: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServerOptions {
    /// Options bound to `port` with every other field defaulted.
    pub fn with_port(port: u16) -> Self {
        Self {
            port: Some(port),
            ..Self::default()
        }
    }

    /// The port handed to the listener.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Address used for the startup announcement, given the port actually bound.
    pub fn display_address(&self, bound_port: u16) -> ServerAddress {
        ServerAddress {
            scheme: self.scheme(),
            host: self.host.clone().unwrap_or_else(|| DISPLAY_HOST.to_string()),
            port: bound_port,
        }
    }
}

/// Scheme, host and port as announced at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub scheme: &'static str,
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = ServerOptions::default();
        assert_eq!(options.port(), 3000);
        assert_eq!(options.grace_period(), Duration::from_millis(1000));
        assert_eq!(options.scheme(), "http");
        assert!(options.host.is_none());
    }

    #[test]
    fn explicit_zero_port_requests_ephemeral_bind() {
        let config: AppConfig = toml::from_str("[server]\nport = 0\n").unwrap();
        assert_eq!(config.server.port(), 0);
        assert_eq!(AppConfig::default().server.port(), DEFAULT_PORT);
    }

    #[test]
    fn display_address_uses_localhost_without_host() {
        let options = ServerOptions::with_port(3000);
        assert_eq!(options.display_address(3000).to_string(), "http://localhost:3000");
    }

    #[test]
    fn display_address_uses_configured_host_and_scheme() {
        let options = ServerOptions {
            host: Some("example.org".into()),
            secure: true,
            ..ServerOptions::with_port(8443)
        };
        assert_eq!(options.display_address(8443).to_string(), "https://example.org:8443");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port(), 8080);
        assert_eq!(config.server.timeout, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.observability.log_level, "info");
    }
}
