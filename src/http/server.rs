//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router with the demo handlers
//! - Wire up middleware (tracing, admission gate)
//! - Hand the router to the shutdown controller, which owns the listener

use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::Query, routing::get, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::http::gate::AdmissionGate;
use crate::lifecycle::{ShutdownController, ShutdownError};
use crate::net::HttpListener;

/// Upper bound for the `/slow` delay.
const MAX_SLOW_MS: u64 = 60_000;

/// HTTP server whose lifecycle is driven by a [`ShutdownController`].
pub struct HttpServer {
    router: Router,
    controller: ShutdownController,
}

impl HttpServer {
    pub fn new(controller: ShutdownController) -> Self {
        let router = Self::build_router(controller.admission_gate());
        Self { router, controller }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(gate: AdmissionGate) -> Router {
        let routes = Router::new()
            .route("/", get(root_handler))
            .route("/slow", get(slow_handler));

        gate.install(routes).layer(TraceLayer::new_for_http())
    }

    /// Start serving. Returns once the listener is bound; the controller
    /// exits the process when shutdown completes.
    pub async fn run(self) -> Result<SocketAddr, ShutdownError> {
        self.controller.start(HttpListener::new(self.router)).await
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

async fn root_handler() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct SlowParams {
    #[serde(default)]
    ms: u64,
}

/// Sleeps for `ms` milliseconds before answering, to observe draining.
async fn slow_handler(Query(params): Query<SlowParams>) -> String {
    let delay = params.ms.min(MAX_SLOW_MS);
    tokio::time::sleep(Duration::from_millis(delay)).await;
    format!("Slept {delay}ms")
}
