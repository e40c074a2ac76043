//! Compute server handlers: status, app info and safe division

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::types::{DivideBody, InfoBody, StatusBody};
use crate::config::AppInfoConfig;
use crate::error::HandlerError;
use crate::http::{self, parse_query};
use crate::math;

pub fn status() -> Response<Full<Bytes>> {
    http::json_response(
        StatusCode::OK,
        &StatusBody {
            status: "ok",
            message: "Hi there!",
        },
    )
}

pub fn info(app: &AppInfoConfig) -> Response<Full<Bytes>> {
    http::json_response(
        StatusCode::OK,
        &InfoBody {
            app: &app.name,
            version: &app.version,
        },
    )
}

/// Divide query operands `a` by `b`
pub fn divide(query: Option<&str>) -> Result<Response<Full<Bytes>>, HandlerError> {
    let params = parse_query(query);
    let quotient = math::divide_operands(
        params.get("a").map(String::as_str),
        params.get("b").map(String::as_str),
    )?;

    Ok(http::json_response(
        StatusCode::OK,
        &DivideBody {
            result: math::quotient_to_json(quotient),
        },
    ))
}
