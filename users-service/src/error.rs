//! Error types and HTTP response conversion
//!
//! Every failure that reaches a client is rendered as the simple envelope
//! `{"status": "fail", "message": "..."}` with the status code of its class:
//!
//! | variant              | status |
//! |----------------------|--------|
//! | `InvalidInput`       | 400    |
//! | `NotFound`           | 404    |
//! | `MethodNotAllowed`   | 405    |
//! | `RateLimitExceeded`  | 429    |
//! | everything else      | 500    |
//!
//! `Internal` carries the client-facing message only. The underlying cause is
//! logged where the error is classified, never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::responses::StatusMessage;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed body, missing or unparseable id, bad JSON
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No matching document on a read path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Verb not registered for the path
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Token bucket empty
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Store unreachable, timed out, decode failure
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status code for this error class
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Error::InvalidInput(msg) | Error::NotFound(msg) | Error::Internal(msg) => msg.clone(),
            Error::MethodNotAllowed => "Method not allowed".to_string(),
            Error::RateLimitExceeded => "Rate limit exceeded".to_string(),
            Error::Config(_) | Error::Io(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Error::Config(e) => tracing::error!("Configuration error: {}", e),
            Error::Io(e) => tracing::error!("I/O error: {}", e),
            _ => {}
        }

        // Plain text, as served by the static endpoint
        if let Error::RateLimitExceeded = self {
            return (status, self.public_message()).into_response();
        }

        (status, Json(StatusMessage::fail(self.public_message()))).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
