//! Request routing dispatch module
//!
//! Matches method and exact path against each server's fixed route table,
//! runs the handler and turns handler errors into JSON error responses.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::sync::Arc;

use super::{compute, documents};
use crate::config::AppState;
use crate::error::HandlerError;
use crate::http;
use crate::logger;

/// Which of the two servers a listener is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum App {
    /// Status, info and safe division
    Compute,
    /// HTML home, time, stored document and echo
    Documents,
}

impl App {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Documents => "document",
        }
    }
}

/// One entry of a route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Status,
    Info,
    Divide,
    Home,
    Time,
    ReadData,
    WriteData,
    Echo,
}

/// Look up the route for `(method, path)`; paths match exactly
///
/// An empty path is treated as `/`.
pub fn resolve(app: App, method: &Method, path: &str) -> Option<Route> {
    match (app, method.clone(), path) {
        (App::Compute, Method::GET, "/" | "") => Some(Route::Status),
        (App::Compute, Method::GET, "/info") => Some(Route::Info),
        (App::Compute, Method::GET, "/math/divide") => Some(Route::Divide),

        (App::Documents, Method::GET, "/" | "") => Some(Route::Home),
        (App::Documents, Method::GET, "/time") => Some(Route::Time),
        (App::Documents, Method::GET, "/data") => Some(Route::ReadData),
        (App::Documents, Method::POST, "/data") => Some(Route::WriteData),
        (App::Documents, Method::POST, "/echo") => Some(Route::Echo),

        _ => None,
    }
}

/// Main entry point for HTTP request handling
///
/// Always produces a response: unmatched routes get 404, handler errors get
/// their mapped 4xx/5xx envelope, and internal failures are logged here.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    app: App,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let Some(route) = resolve(app, &method, &path) else {
        logger::log_debug(&format!("No route for {method} {path}"));
        return http::build_404_response();
    };

    match dispatch(route, req, &state).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_internal() {
                logger::log_error(&format!("{method} {path} failed: {err}"));
            } else {
                logger::log_debug(&format!("{method} {path} rejected: {err}"));
            }
            http::error_response(err.status(), err.client_message())
        }
    }
}

async fn dispatch<B>(
    route: Route,
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, HandlerError>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    match route {
        Route::Status => Ok(compute::status()),
        Route::Info => Ok(compute::info(&state.config.app)),
        Route::Divide => compute::divide(req.uri().query()),
        Route::Home => Ok(documents::home()),
        Route::Time => Ok(documents::time()),
        Route::ReadData => documents::read_data(state.store.as_ref()).await,
        Route::WriteData => documents::write_data(req.into_body(), state.store.as_ref()).await,
        Route::Echo => documents::echo(req.into_body()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::StoreError;
    use crate::store::{DocumentStore, MemoryStore};
    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use serde_json::{json, Value};

    fn test_config() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        Config::load_with(missing.to_str().unwrap(), None).unwrap()
    }

    fn state_with(store: Arc<dyn DocumentStore>) -> Arc<AppState> {
        Arc::new(AppState::new(&test_config(), store))
    }

    fn memory_state() -> Arc<AppState> {
        state_with(Arc::new(MemoryStore::new()))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn call(
        app: App,
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let resp = handle_request(request(method, uri, body), Arc::clone(state), app).await;
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Store whose every operation fails
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn read(&self) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }

        async fn write(&self, _value: &Value) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }
    }

    #[test]
    fn test_resolve_is_method_and_path_exact() {
        assert_eq!(resolve(App::Compute, &Method::GET, "/"), Some(Route::Status));
        assert_eq!(resolve(App::Compute, &Method::GET, ""), Some(Route::Status));
        assert_eq!(resolve(App::Compute, &Method::POST, "/"), None);
        assert_eq!(resolve(App::Compute, &Method::GET, "/info/"), None);
        assert_eq!(resolve(App::Compute, &Method::GET, "/time"), None);
        assert_eq!(resolve(App::Documents, &Method::GET, "/data"), Some(Route::ReadData));
        assert_eq!(resolve(App::Documents, &Method::POST, "/data"), Some(Route::WriteData));
        assert_eq!(resolve(App::Documents, &Method::PUT, "/data"), None);
        assert_eq!(resolve(App::Documents, &Method::GET, "/echo"), None);
    }

    #[tokio::test]
    async fn test_compute_static_routes() {
        let state = memory_state();
        let (status, body) = call(App::Compute, &state, Method::GET, "/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "message": "Hi there!"}));

        let (status, body) = call(App::Compute, &state, Method::GET, "/info", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"app": "example", "version": "1.0.0"}));
    }

    #[tokio::test]
    async fn test_divide_results() {
        let state = memory_state();
        for (a, b) in [(10.0_f64, 4.0_f64), (1.0, 3.0), (-7.5, 2.5), (0.0, 9.0), (1e6, -1e-3)] {
            let uri = format!("/math/divide?a={a}&b={b}");
            let (status, body) = call(App::Compute, &state, Method::GET, &uri, "").await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["result"].as_f64(), Some(a / b), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_divide_errors() {
        let state = memory_state();
        let (status, body) =
            call(App::Compute, &state, Method::GET, "/math/divide?a=1&b=0", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "cannot divide by zero"}));

        let (status, body) =
            call(App::Compute, &state, Method::GET, "/math/divide?a=x&b=1", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "operands must be numbers"}));

        let (status, _) = call(App::Compute, &state, Method::GET, "/math/divide", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_data_round_trip() {
        let state = memory_state();
        let (status, body) = call(App::Documents, &state, Method::GET, "/data", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "no data found"}));

        let (status, body) =
            call(App::Documents, &state, Method::POST, "/data", r#"{"k":1}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"saved": true, "data": {"k": 1}}));

        let (status, body) = call(App::Documents, &state, Method::GET, "/data", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"k": 1}));
    }

    #[tokio::test]
    async fn test_data_rejects_empty_and_malformed() {
        let state = memory_state();
        let (status, body) = call(App::Documents, &state, Method::POST, "/data", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "empty body"}));

        let (status, body) = call(App::Documents, &state, Method::POST, "/data", "null").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "empty body"}));

        let (status, body) = call(App::Documents, &state, Method::POST, "/data", "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid json"}));

        // nothing was stored
        let (status, _) = call(App::Documents, &state, Method::GET, "/data", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_echo() {
        let state = memory_state();
        let (status, body) =
            call(App::Documents, &state, Method::POST, "/echo", r#"{"x":true}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"echoed": {"x": true}}));

        let (status, body) = call(App::Documents, &state, Method::POST, "/echo", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"echoed": null}));

        let (status, body) = call(App::Documents, &state, Method::POST, "/echo", "[1,").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid json"}));
    }

    #[tokio::test]
    async fn test_time_is_iso8601_utc() {
        let state = memory_state();
        let (status, body) = call(App::Documents, &state, Method::GET, "/time", "").await;
        assert_eq!(status, StatusCode::OK);
        let text = body["serverTime"].as_str().unwrap();
        assert!(text.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(text).is_ok());
    }

    #[tokio::test]
    async fn test_home_page_is_html() {
        let state = memory_state();
        let resp = handle_request(request(Method::GET, "/", ""), state, App::Documents).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("href=\"/time\""));
        assert!(html.contains("href=\"/data\""));
    }

    #[tokio::test]
    async fn test_unmatched_routes_are_404() {
        let state = memory_state();
        for (app, method, uri) in [
            (App::Compute, Method::GET, "/nope"),
            (App::Compute, Method::DELETE, "/info"),
            (App::Compute, Method::POST, "/data"),
            (App::Documents, Method::GET, "/info"),
            (App::Documents, Method::PATCH, "/echo"),
        ] {
            let (status, body) = call(app, &state, method, uri, "").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({"error": "not found"}));
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let state = state_with(Arc::new(BrokenStore));
        let (status, body) = call(App::Documents, &state, Method::GET, "/data", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "internal server error"}));

        let (status, body) = call(App::Documents, &state, Method::POST, "/data", "1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "internal server error"}));
    }
}
