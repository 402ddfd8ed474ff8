//! End-to-end draining over real sockets.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use graceful_tools::lifecycle::ShutdownController;
use graceful_tools::net::HttpListener;
use graceful_tools::{HttpServer, ServerOptions, TerminationSignal};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;

mod common;

use common::RecordingExit;

fn options(timeout_ms: u64) -> ServerOptions {
    ServerOptions {
        host: Some("127.0.0.1".into()),
        timeout: timeout_ms,
        ..ServerOptions::with_port(0)
    }
}

/// Start a gated server whose `/work` handler reports entry, then sleeps.
async fn start_tracked_server(
    timeout_ms: u64,
    work: Duration,
    exit: &RecordingExit,
) -> (ShutdownController, SocketAddr, Arc<Notify>) {
    let controller = ShutdownController::builder(options(timeout_ms))
        .exit_with(exit.clone())
        .build();

    let entered = Arc::new(Notify::new());
    let in_handler = entered.clone();
    let routes = Router::new().route(
        "/work",
        get(move || {
            let in_handler = in_handler.clone();
            async move {
                in_handler.notify_one();
                tokio::time::sleep(work).await;
                "done"
            }
        }),
    );
    let app = controller.admission_gate().install(routes);

    let addr = controller.start(HttpListener::new(app)).await.unwrap();
    (controller, addr, entered)
}

/// Write a request on a fresh connection; the returned task yields the raw response.
async fn send_request(addr: SocketAddr, path: &str) -> tokio::task::JoinHandle<std::io::Result<String>> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    tokio::spawn(async move {
        let mut response = String::new();
        stream.read_to_string(&mut response).await?;
        Ok(response)
    })
}

#[tokio::test]
async fn in_flight_request_completes_before_clean_exit() {
    let exit = RecordingExit::default();
    let (controller, addr, entered) =
        start_tracked_server(5_000, Duration::from_millis(300), &exit).await;

    let response = send_request(addr, "/work").await;
    tokio::time::timeout(Duration::from_secs(5), entered.notified())
        .await
        .expect("request should reach the handler");

    controller.handle_signal(TerminationSignal::Terminate);

    let response = response.await.unwrap().expect("in-flight request should finish");
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("done"), "{response}");

    let code = tokio::time::timeout(Duration::from_secs(3), exit.wait())
        .await
        .expect("listener should drain within the grace period");
    assert_eq!(code, 0);
}

#[tokio::test]
async fn stuck_request_forces_exit() {
    let exit = RecordingExit::default();
    let (controller, addr, entered) =
        start_tracked_server(100, Duration::from_secs(10), &exit).await;

    let response = send_request(addr, "/work").await;
    tokio::time::timeout(Duration::from_secs(5), entered.notified())
        .await
        .expect("request should reach the handler");

    controller.handle_signal(TerminationSignal::Interrupt);

    let code = tokio::time::timeout(Duration::from_secs(2), exit.wait())
        .await
        .expect("grace period should force an exit");
    assert_eq!(code, 1);

    response.abort();
}

#[tokio::test]
async fn idle_server_exits_cleanly() {
    let exit = RecordingExit::default();
    let controller = ShutdownController::builder(options(5_000))
        .exit_with(exit.clone())
        .build();
    let addr = HttpServer::new(controller.clone()).run().await.unwrap();

    let response = send_request(addr, "/").await.await.unwrap().unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("OK"), "{response}");

    controller.handle_signal(TerminationSignal::Terminate);

    let code = tokio::time::timeout(Duration::from_secs(3), exit.wait())
        .await
        .unwrap();
    assert_eq!(code, 0);
}
