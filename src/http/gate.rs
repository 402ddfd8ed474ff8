//! Admission gate middleware.
//! Rejects new requests once shutdown has begun.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::http::response;
use crate::lifecycle::state::ShutdownFlag;
use crate::observability::metrics;

/// Per-request check against the controller's shutdown state.
#[derive(Clone, Debug)]
pub struct AdmissionGate {
    flag: ShutdownFlag,
}

impl AdmissionGate {
    pub fn new(flag: ShutdownFlag) -> Self {
        Self { flag }
    }

    /// Whether a request arriving now would be admitted.
    pub fn admits(&self) -> bool {
        self.flag.get().is_running()
    }

    /// Wrap every route of `router` with the gate.
    pub fn install<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(middleware::from_fn_with_state(self, admission_gate))
    }
}

pub async fn admission_gate(
    State(gate): State<AdmissionGate>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if gate.admits() {
        return next.run(req).await;
    }

    tracing::debug!(
        method = %req.method(),
        path = %req.uri().path(),
        "Rejecting request during shutdown"
    );
    metrics::record_rejection();
    response::shutting_down()
}
