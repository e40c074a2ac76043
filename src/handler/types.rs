// Response body types for both servers

use serde::Serialize;
use serde_json::Value;

/// `GET /` on the compute server
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: &'static str,
}

/// `GET /info`
#[derive(Debug, Serialize)]
pub struct InfoBody<'a> {
    pub app: &'a str,
    pub version: &'a str,
}

/// `GET /math/divide`
#[derive(Debug, Serialize)]
pub struct DivideBody {
    pub result: Value,
}

/// `GET /time`
#[derive(Debug, Serialize)]
pub struct TimeBody {
    #[serde(rename = "serverTime")]
    pub server_time: String,
}

/// `POST /data`
#[derive(Debug, Serialize)]
pub struct SavedBody<'a> {
    pub saved: bool,
    pub data: &'a Value,
}

/// `POST /echo`
#[derive(Debug, Serialize)]
pub struct EchoBody {
    pub echoed: Value,
}
