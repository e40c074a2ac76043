// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::lifecycle::{Lifecycle, LifecycleState, ShutdownOutcome};
use super::listener::create_listener;
use crate::config::AppState;
use crate::handler::App;
use crate::logger;

/// A bound server, ready to accept connections
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    app: App,
    lifecycle: Arc<Lifecycle>,
    drain_timeout: Duration,
}

impl Server {
    /// Bind `addr` and enter `Listening`
    ///
    /// Fails if the address is already in use. Must be called from within a
    /// Tokio runtime.
    pub fn bind(addr: SocketAddr, state: Arc<AppState>, app: App) -> std::io::Result<Self> {
        let listener = create_listener(addr)?;
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.transition(LifecycleState::Stopped, LifecycleState::Listening);
        let drain_timeout = state.config.drain_timeout();

        Ok(Self {
            listener,
            state,
            app,
            lifecycle,
            drain_timeout,
        })
    }

    #[must_use]
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// Accept connections until `shutdown` resolves, then drain
    ///
    /// Draining closes the listener, lets in-flight requests finish and closes
    /// idle keep-alive connections. Returns `Forced` if that takes longer than
    /// the drain timeout; remaining connections are left to be dropped with the
    /// runtime.
    pub async fn run<F>(self, shutdown: F) -> ShutdownOutcome
    where
        F: Future<Output = ()>,
    {
        let Self {
            listener,
            state,
            app,
            lifecycle,
            drain_timeout,
        } = self;

        let graceful = GracefulShutdown::new();
        let active_connections = Arc::new(AtomicUsize::new(0));
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(
                                stream,
                                peer_addr,
                                &state,
                                app,
                                &graceful,
                                &active_connections,
                            );
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = &mut shutdown => break,
            }
        }

        lifecycle.transition(LifecycleState::Listening, LifecycleState::Draining);
        // Refuse new connections from here on
        drop(listener);
        logger::log_drain_started(active_connections.load(Ordering::SeqCst), drain_timeout);

        let outcome = match tokio::time::timeout(drain_timeout, graceful.shutdown()).await {
            Ok(()) => {
                logger::log_drain_completed();
                ShutdownOutcome::Graceful
            }
            Err(_) => {
                logger::log_drain_timed_out(active_connections.load(Ordering::SeqCst));
                ShutdownOutcome::Forced
            }
        };

        lifecycle.transition(LifecycleState::Draining, LifecycleState::Stopped);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::StoreError;
    use crate::store::{DocumentStore, MemoryStore};
    use async_trait::async_trait;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    fn test_state(store: Arc<dyn DocumentStore>) -> Arc<AppState> {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let mut config = Config::load_with(missing.to_str().unwrap(), None).unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(&config, store))
    }

    struct Running {
        addr: SocketAddr,
        lifecycle: Arc<Lifecycle>,
        stop: oneshot::Sender<()>,
        handle: tokio::task::JoinHandle<ShutdownOutcome>,
    }

    fn start(app: App, store: Arc<dyn DocumentStore>, drain: Duration) -> Running {
        let server = Server::bind("127.0.0.1:0".parse().unwrap(), test_state(store), app)
            .unwrap()
            .with_drain_timeout(drain);
        let addr = server.local_addr().unwrap();
        let lifecycle = server.lifecycle();
        let (stop, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async move {
            let _ = rx.await;
        }));
        Running {
            addr,
            lifecycle,
            stop,
            handle,
        }
    }

    async fn send_raw(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Store whose read panics
    struct PanickingStore;

    #[async_trait]
    impl DocumentStore for PanickingStore {
        async fn read(&self) -> Result<Option<Value>, StoreError> {
            panic!("read exploded")
        }

        async fn write(&self, _value: &Value) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_serves_requests_and_stops_gracefully() {
        let running = start(App::Compute, Arc::new(MemoryStore::new()), Duration::from_secs(5));
        assert_eq!(running.lifecycle.state(), LifecycleState::Listening);

        let response = send_raw(
            running.addr,
            "GET /info HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("content-type: application/json"));
        assert!(response.contains("\"app\": \"example\""));

        running.stop.send(()).unwrap();
        assert_eq!(running.handle.await.unwrap(), ShutdownOutcome::Graceful);
        assert_eq!(running.lifecycle.state(), LifecycleState::Stopped);

        // listener is closed once draining starts
        assert!(TcpStream::connect(running.addr).await.is_err());
    }

    #[tokio::test]
    async fn test_in_flight_request_completes_during_drain() {
        let running = start(App::Documents, Arc::new(MemoryStore::new()), Duration::from_secs(5));

        let mut stream = TcpStream::connect(running.addr).await.unwrap();
        stream
            .write_all(b"POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10\r\n\r\n{\"x\":")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        running.stop.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        stream.write_all(b"true}").await.unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        let response = String::from_utf8(buf).unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains("\"echoed\""));
        assert!(response.contains("\"x\": true"));

        assert_eq!(running.handle.await.unwrap(), ShutdownOutcome::Graceful);
    }

    #[tokio::test]
    async fn test_stuck_request_forces_shutdown() {
        let running = start(
            App::Documents,
            Arc::new(MemoryStore::new()),
            Duration::from_millis(200),
        );

        let mut stream = TcpStream::connect(running.addr).await.unwrap();
        stream
            .write_all(b"POST /data HTTP/1.1\r\nHost: localhost\r\nContent-Length: 100\r\n\r\n{")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        running.stop.send(()).unwrap();
        assert_eq!(running.handle.await.unwrap(), ShutdownOutcome::Forced);
        assert_eq!(running.lifecycle.state(), LifecycleState::Stopped);
        drop(stream);
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_500() {
        let running = start(App::Documents, Arc::new(PanickingStore), Duration::from_secs(5));

        let response = send_raw(
            running.addr,
            "GET /data HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error"), "{response}");
        assert!(response.contains("internal server error"));

        running.stop.send(()).unwrap();
        assert_eq!(running.handle.await.unwrap(), ShutdownOutcome::Graceful);
    }

    #[tokio::test]
    async fn test_second_bind_on_same_port_fails() {
        let running = start(App::Compute, Arc::new(MemoryStore::new()), Duration::from_secs(1));
        let second = Server::bind(
            running.addr,
            test_state(Arc::new(MemoryStore::new())),
            App::Compute,
        );
        assert!(second.is_err());

        running.stop.send(()).unwrap();
        running.handle.await.unwrap();
    }
}
