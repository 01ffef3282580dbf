//! Error types for the proxy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for upstream operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors talking to the upstream API.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request never produced a response, or its body was unreadable.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// The upstream answered with data missing a required field.
    #[error("malformed upstream record: {0}")]
    Malformed(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A failed API call. Always answered with 500 and a client-facing message;
/// the underlying cause is only logged.
#[derive(Debug)]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, cause: ProxyError) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{}", message);
        Self { message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
