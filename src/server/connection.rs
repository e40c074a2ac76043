// Connection handling module
// Serves one accepted TCP connection and writes access log entries

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;

use crate::config::AppState;
use crate::handler::{self, App};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Serve an accepted connection in its own task
///
/// The connection is registered with `graceful` so a drain lets the current
/// request finish and then closes the connection. `active` is incremented
/// here and decremented when the connection ends.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    app: App,
    graceful: &GracefulShutdown,
    active: &Arc<AtomicUsize>,
) {
    active.fetch_add(1, Ordering::SeqCst);
    logger::log_connection_accepted(&peer_addr);

    let io = TokioIo::new(stream);
    let state = Arc::clone(state);
    let service = service_fn(move |req: Request<Incoming>| {
        let state = Arc::clone(&state);
        async move { Ok::<_, Infallible>(respond(req, state, app, peer_addr).await) }
    });

    let conn = http1::Builder::new()
        .keep_alive(true)
        .serve_connection(io, service);
    let conn = graceful.watch(conn);

    let active = Arc::clone(active);
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
        active.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Run the handler in its own task so a panic still yields a 500
async fn respond(
    req: Request<Incoming>,
    state: Arc<AppState>,
    app: App,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let mut entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, peer_addr));

    let response = match tokio::spawn(handler::handle_request(req, Arc::clone(&state), app)).await
    {
        Ok(response) => response,
        Err(err) => {
            logger::log_error(&format!("Request handler failed: {err}"));
            http::build_internal_error_response()
        }
    };

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    response
}

fn access_entry(req: &Request<Incoming>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    if req.version() == hyper::Version::HTTP_10 {
        entry.http_version = "1.0".to_string();
    }
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}
