//! Demo server with graceful shutdown.
//!
//! ```text
//! start ──▶ bind listener ──▶ announce ──▶ serve (admission gate on every request)
//!                                              │
//!                          SIGTERM / SIGINT ───┘
//!                                              ▼
//!                   draining: 502 for new requests, in-flight requests finish
//!                                              │
//!                  ┌───────────────────────────┴───────────────────────────┐
//!                  ▼                                                       ▼
//!        all connections closed                                 grace period elapsed
//!             exit(0)                                                 exit(1)
//! ```

use std::path::PathBuf;

use clap::Parser;

use graceful_tools::config::validation::validate_config;
use graceful_tools::config::{load_config, AppConfig, ConfigError};
use graceful_tools::observability::{logging, metrics};
use graceful_tools::{HttpServer, ShutdownController};

#[derive(Parser)]
#[command(name = "graceful-tools")]
#[command(about = "HTTP server that drains connections on SIGTERM/SIGINT", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (default 3000, 0 for any free port).
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind; all interfaces when omitted.
    #[arg(long)]
    host: Option<String>,

    /// Announce the address as https.
    #[arg(long)]
    secure: bool,

    /// Grace period in milliseconds.
    #[arg(short, long)]
    timeout: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };

        if self.port.is_some() {
            config.server.port = self.port;
        }
        if self.host.is_some() {
            config.server.host = self.host;
        }
        if self.secure {
            config.server.secure = true;
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout = timeout;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        port = config.server.port(),
        host = ?config.server.host,
        grace_period_ms = config.server.timeout,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let controller = ShutdownController::builder(config.server.clone())
        .on_shutdown(|signal| tracing::info!(signal = %signal, "Stopping background work"))
        .build();

    HttpServer::new(controller).run().await?;

    // The shutdown controller exits the process.
    std::future::pending::<()>().await;
    Ok(())
}
