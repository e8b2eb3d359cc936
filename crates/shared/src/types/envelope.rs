//! Uniform response envelope.
//!
//! Every successful response is `{ "status": <http status>, "data": ... }` and
//! every failure is `{ "status": <http status>, "error": <code>, "message": ... }`.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// HTTP status code echoed in the body.
    pub status: u16,
    /// Response payload.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps `data` with an explicit status.
    #[must_use]
    pub const fn with_status(status: u16, data: T) -> Self {
        Self { status, data }
    }

    /// 200 OK.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::with_status(200, data)
    }

    /// 201 Created.
    #[must_use]
    pub const fn created(data: T) -> Self {
        Self::with_status(201, data)
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status code echoed in the body.
    pub status: u16,
    /// Stable machine-readable error code.
    pub error: String,
    /// Human-readable message, never carrying storage internals.
    pub message: String,
}

impl From<&AppError> for ErrorEnvelope {
    fn from(err: &AppError) -> Self {
        Self {
            status: err.status_code(),
            error: err.error_code().to_string(),
            message: err.public_message(),
        }
    }
}
