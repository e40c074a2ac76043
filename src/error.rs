//! Error types shared by the request handlers and the document store

use hyper::StatusCode;
use thiserror::Error;

use crate::math::MathError;

/// Failures raised by the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage could not be read or written
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document is not valid JSON
    #[error("stored document is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The value could not be serialized for storage
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failures raised while handling a single request
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Request body is present but is not valid JSON
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("operands must be numbers")]
    InvalidOperand,

    #[error("cannot divide by zero")]
    DivisionByZero,

    /// Body required but missing (or JSON `null`)
    #[error("empty body")]
    EmptyBody,

    /// No stored document exists yet
    #[error("no data found")]
    NotFound,

    /// Request body stream failed before completion
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_)
            | Self::InvalidOperand
            | Self::DivisionByZero
            | Self::EmptyBody => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BodyRead(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `{"error": ...}` envelope sent to the client
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "invalid json",
            Self::InvalidOperand => "operands must be numbers",
            Self::DivisionByZero => "cannot divide by zero",
            Self::EmptyBody => "empty body",
            Self::NotFound => "no data found",
            Self::BodyRead(_) | Self::Store(_) | Self::Internal(_) => "internal server error",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::BodyRead(_) | Self::Store(_) | Self::Internal(_))
    }
}

impl From<MathError> for HandlerError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidOperand => Self::InvalidOperand,
            MathError::DivisionByZero => Self::DivisionByZero,
        }
    }
}
