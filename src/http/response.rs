//! HTTP response building module
//!
//! Builders for JSON, plain-text and HTML responses on `Full<Bytes>` bodies.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build a pretty-printed JSON response with an exact Content-Length
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string_pretty(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_internal_error_response();
        }
    };

    build_response(status, "application/json", Bytes::from(json))
}

/// Build a plain-text response; the text is sent verbatim
pub fn text_response(status: StatusCode, text: impl Into<String>) -> Response<Full<Bytes>> {
    build_response(status, "text/plain; charset=utf-8", Bytes::from(text.into()))
}

/// Build generic HTML response
pub fn html_response(status: StatusCode, content: impl Into<String>) -> Response<Full<Bytes>> {
    build_response(status, "text/html; charset=utf-8", Bytes::from(content.into()))
}

/// Error envelope sent for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Build a `{"error": message}` response
pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &ErrorBody { error: message })
}

/// Build 404 `{"error":"not found"}` response for unmatched routes
pub fn build_404_response() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "not found")
}

/// Build 500 response without going through serde
pub fn build_internal_error_response() -> Response<Full<Bytes>> {
    build_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "application/json",
        Bytes::from_static(b"{\n  \"error\": \"internal server error\"\n}"),
    )
}

fn build_response(status: StatusCode, content_type: &str, body: Bytes) -> Response<Full<Bytes>> {
    let content_length = body.len();
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
