//! Shared test doubles for the shutdown controller.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt};
use graceful_tools::lifecycle::ProcessExit;
use graceful_tools::net::{Listener, ListenerError};
use tokio::sync::{oneshot, Notify};

/// Ordered log of calls, shared between a test and its doubles.
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<&'static str>>>);

impl Events {
    pub fn push(&self, event: &'static str) {
        self.0.lock().unwrap().push(event);
    }

    pub fn snapshot(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

/// Listener that records calls and drains only when told to.
pub struct MockListener {
    events: Events,
    listen_calls: Arc<Mutex<Vec<(u16, Option<String>)>>>,
    close_calls: Arc<AtomicUsize>,
    drained: Option<oneshot::Receiver<()>>,
}

/// Test-side view of a [`MockListener`].
pub struct MockHandle {
    pub events: Events,
    listen_calls: Arc<Mutex<Vec<(u16, Option<String>)>>>,
    close_calls: Arc<AtomicUsize>,
    drain: Mutex<Option<oneshot::Sender<()>>>,
}

impl MockListener {
    pub fn new() -> (Self, MockHandle) {
        let events = Events::default();
        let listen_calls = Arc::new(Mutex::new(Vec::new()));
        let close_calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel();

        let listener = Self {
            events: events.clone(),
            listen_calls: listen_calls.clone(),
            close_calls: close_calls.clone(),
            drained: Some(rx),
        };
        let handle = MockHandle {
            events,
            listen_calls,
            close_calls,
            drain: Mutex::new(Some(tx)),
        };
        (listener, handle)
    }
}

impl Listener for MockListener {
    fn listen(
        &mut self,
        port: u16,
        host: Option<String>,
    ) -> BoxFuture<'_, Result<SocketAddr, ListenerError>> {
        self.events.push("listen");
        self.listen_calls.lock().unwrap().push((port, host));
        async move { Ok(SocketAddr::from(([127, 0, 0, 1], port))) }.boxed()
    }

    fn close(&mut self) -> BoxFuture<'static, ()> {
        self.events.push("close");
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        let drained = self.drained.take();
        async move {
            if let Some(drained) = drained {
                let _ = drained.await;
            }
        }
        .boxed()
    }
}

/// Listener whose bind always fails, like a port already in use.
pub struct FailingListener;

impl Listener for FailingListener {
    fn listen(
        &mut self,
        port: u16,
        host: Option<String>,
    ) -> BoxFuture<'_, Result<SocketAddr, ListenerError>> {
        let addr = format!("{}:{port}", host.unwrap_or_else(|| "0.0.0.0".into()));
        async move {
            Err(ListenerError::Bind {
                addr,
                source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
            })
        }
        .boxed()
    }

    fn close(&mut self) -> BoxFuture<'static, ()> {
        async {}.boxed()
    }
}

/// Send `signal` (e.g. "TERM") to this test process.
#[cfg(unix)]
pub fn kill_self(signal: &str) {
    let status = std::process::Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(std::process::id().to_string())
        .status()
        .expect("kill should run");
    assert!(status.success());
}

impl MockHandle {
    pub fn listen_calls(&self) -> Vec<(u16, Option<String>)> {
        self.listen_calls.lock().unwrap().clone()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Report that every connection has ended.
    pub fn finish_drain(&self) {
        if let Some(tx) = self.drain.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }
}

/// Exit hook that records codes instead of terminating.
#[derive(Clone, Default)]
pub struct RecordingExit {
    codes: Arc<Mutex<Vec<i32>>>,
    notify: Arc<Notify>,
}

impl RecordingExit {
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().unwrap().clone()
    }

    /// Wait for the first recorded exit code.
    pub async fn wait(&self) -> i32 {
        loop {
            let notified = self.notify.notified();
            if let Some(code) = self.codes().first() {
                return *code;
            }
            notified.await;
        }
    }
}

impl ProcessExit for RecordingExit {
    fn exit(&self, code: i32) {
        self.codes.lock().unwrap().push(code);
        self.notify.notify_waiters();
    }
}
