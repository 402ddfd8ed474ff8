//! Startup announcement and supervisor readiness.
//!
//! # Responsibilities
//! - Announce the listening address once the bind succeeded
//! - Tell a supervising process that the server is ready
//!
//! # Design Decisions
//! - Readiness uses the `NOTIFY_SOCKET` datagram protocol (`READY=1`)
//! - Readiness failures are logged, never fatal

use crate::config::{ServerAddress, ServerOptions};

/// Environment variable naming the supervisor's notification socket.
pub const NOTIFY_SOCKET_ENV: &str = "NOTIFY_SOCKET";

const READY_MESSAGE: &[u8] = b"READY=1\n";

/// Text of the startup announcement.
pub fn announcement(options: &ServerOptions, address: &ServerAddress) -> String {
    match &options.host {
        Some(host) => format!("Server listening on {address} (bound to host: {host})"),
        None => format!("Server listening on {address}"),
    }
}

/// Log the announcement and notify a supervisor if there is one.
pub async fn announce_ready(options: &ServerOptions, bound_port: u16) {
    let address = options.display_address(bound_port);
    tracing::info!(address = %address, "{}", announcement(options, &address));

    match std::env::var(NOTIFY_SOCKET_ENV) {
        Ok(socket) if !socket.is_empty() => {
            if let Err(e) = notify_ready(&socket).await {
                tracing::warn!(socket = %socket, error = %e, "Failed to notify supervisor");
            }
        }
        _ => {}
    }
}

#[cfg(unix)]
async fn notify_ready(socket: &str) -> std::io::Result<()> {
    if socket.starts_with('@') {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "abstract notification sockets are not supported",
        ));
    }

    let datagram = tokio::net::UnixDatagram::unbound()?;
    datagram.send_to(READY_MESSAGE, socket).await?;
    tracing::debug!(socket = %socket, "Supervisor notified");
    Ok(())
}

#[cfg(not(unix))]
async fn notify_ready(_socket: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "readiness notification requires unix sockets",
    ))
}
