//! Listener abstraction and the axum-backed implementation.
//!
//! # Responsibilities
//! - Bind to the configured host/port
//! - Serve the HTTP pipeline until asked to close
//! - Report when every open connection has finished
//!
//! # Design Decisions
//! - `close` returns a future instead of taking a completion callback
//! - Closing stops accepting immediately; in-flight requests run to completion
//! - Without a host the listener binds all interfaces

use std::net::SocketAddr;

use axum::Router;
use futures_util::future::{self, BoxFuture, FutureExt};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// `listen` called on a listener that is already serving.
    #[error("Listener is already serving on {0}")]
    AlreadyListening(SocketAddr),
}

/// The two operations the shutdown controller needs from a server.
pub trait Listener: Send + 'static {
    /// Bind and start serving. Resolves to the bound address.
    fn listen(
        &mut self,
        port: u16,
        host: Option<String>,
    ) -> BoxFuture<'_, Result<SocketAddr, ListenerError>>;

    /// Stop accepting connections. The returned future resolves once every
    /// connection that was open has ended.
    fn close(&mut self) -> BoxFuture<'static, ()>;
}

struct Serving {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Serves an axum [`Router`] on a TCP socket.
pub struct HttpListener {
    router: Router,
    serving: Option<Serving>,
}

impl HttpListener {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            serving: None,
        }
    }

    /// Address currently being served, if any.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.serving.as_ref().map(|s| s.addr)
    }
}

impl Listener for HttpListener {
    fn listen(
        &mut self,
        port: u16,
        host: Option<String>,
    ) -> BoxFuture<'_, Result<SocketAddr, ListenerError>> {
        async move {
            if let Some(serving) = &self.serving {
                return Err(ListenerError::AlreadyListening(serving.addr));
            }

            let host = host.unwrap_or_else(|| "0.0.0.0".to_string());
            let bind_err = |source: std::io::Error| ListenerError::Bind {
                addr: format!("{host}:{port}"),
                source,
            };

            let listener = TcpListener::bind((host.as_str(), port))
                .await
                .map_err(bind_err)?;
            let addr = listener.local_addr().map_err(bind_err)?;

            tracing::debug!(address = %addr, "Listener bound");

            let (stop, stopped) = oneshot::channel::<()>();
            let router = self.router.clone();
            let task = tokio::spawn(async move {
                axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        let _ = stopped.await;
                    })
                    .await
            });

            self.serving = Some(Serving { addr, stop, task });
            Ok(addr)
        }
        .boxed()
    }

    fn close(&mut self) -> BoxFuture<'static, ()> {
        let Some(serving) = self.serving.take() else {
            return future::ready(()).boxed();
        };

        tracing::debug!(address = %serving.addr, "Listener closing");
        let _ = serving.stop.send(());

        async move {
            match serving.task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "Server stopped with error"),
                Err(e) => tracing::error!(error = %e, "Server task failed"),
            }
        }
        .boxed()
    }
}
