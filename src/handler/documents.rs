//! Document server handlers: home page, server time, stored document, echo

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};
use serde_json::Value;

use super::types::{EchoBody, SavedBody, TimeBody};
use crate::error::HandlerError;
use crate::http::{self, parse_json_body};
use crate::store::DocumentStore;

const HOME_PAGE: &str = concat!(
    "<!doctype html><html><head><meta charset=\"utf-8\"><title>document-server</title></head><body>",
    "<h1>Document Server</h1>",
    "<ul>",
    "<li><a href=\"/time\">/time</a> - server time (JSON)</li>",
    "<li><a href=\"/data\">/data</a> - read saved JSON</li>",
    "</ul>",
    "<p>Use POST /data to save JSON, POST /echo to echo JSON.</p>",
    "</body></html>",
);

pub fn home() -> Response<Full<Bytes>> {
    http::html_response(StatusCode::OK, HOME_PAGE)
}

/// Current UTC time, millisecond precision with a `Z` suffix
pub fn time() -> Response<Full<Bytes>> {
    http::json_response(
        StatusCode::OK,
        &TimeBody {
            server_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    )
}

pub async fn read_data(store: &dyn DocumentStore) -> Result<Response<Full<Bytes>>, HandlerError> {
    let document = store.read().await?.ok_or(HandlerError::NotFound)?;
    Ok(http::json_response(StatusCode::OK, &document))
}

/// Replace the stored document with the request body
///
/// An empty body or a JSON `null` is rejected before the store is touched.
pub async fn write_data<B>(
    body: B,
    store: &dyn DocumentStore,
) -> Result<Response<Full<Bytes>>, HandlerError>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let value = match parse_json_body(body).await? {
        None | Some(Value::Null) => return Err(HandlerError::EmptyBody),
        Some(value) => value,
    };

    store.write(&value).await?;
    Ok(http::json_response(
        StatusCode::CREATED,
        &SavedBody {
            saved: true,
            data: &value,
        },
    ))
}

pub async fn echo<B>(body: B) -> Result<Response<Full<Bytes>>, HandlerError>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let echoed = parse_json_body(body).await?.unwrap_or(Value::Null);
    Ok(http::json_response(StatusCode::OK, &EchoBody { echoed }))
}
