//! Request body parsing
//!
//! Collects the whole body stream and parses it as JSON.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use serde_json::Value;

use crate::error::HandlerError;

/// Collect a request body and parse it as JSON
///
/// An empty body yields `Ok(None)`. Non-empty text that is not valid UTF-8
/// or not valid JSON yields `HandlerError::MalformedBody`. No size limit is
/// applied.
pub async fn parse_json_body<B>(body: B) -> Result<Option<Value>, HandlerError>
where
    B: Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let bytes = body
        .collect()
        .await
        .map_err(|e| HandlerError::BodyRead(e.to_string()))?
        .to_bytes();

    parse_json_bytes(&bytes)
}

/// Parse already-collected body bytes
pub fn parse_json_bytes(bytes: &[u8]) -> Result<Option<Value>, HandlerError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| HandlerError::MalformedBody(e.to_string()))?;
    if text.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| HandlerError::MalformedBody(e.to_string()))
}
