//! Error types for upstream calls and the HTTP boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use thiserror::Error;

/// Errors from the upstream quote API.
#[derive(Debug, Error, Clone)]
pub enum UpstreamError {
    /// Upstream responded with a non-success HTTP status.
    #[error("upstream returned status {status}")]
    Status {
        /// HTTP status code returned by upstream.
        status: u16,
    },

    /// Upstream responded 200 but with no matching results.
    #[error("ticker not found: {ticker}")]
    TickerNotFound {
        /// The ticker that produced no results.
        ticker: String,
    },

    /// Upstream responded 200 but the body was not the expected shape.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The request never completed (connect failure, timeout).
    #[error("upstream network error: {0}")]
    Network(String),
}

/// JSON body returned for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Boundary error wrapper translating [`UpstreamError`] into an HTTP
/// response. Single-item endpoints propagate errors here unchanged;
/// the batch endpoint never constructs one.
#[derive(Debug)]
pub struct ApiError(UpstreamError);

impl ApiError {
    /// The status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            // Pass the upstream status through as the transport error.
            UpstreamError::Status { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            UpstreamError::TickerNotFound { .. } => StatusCode::NOT_FOUND,
            UpstreamError::MalformedResponse(_) | UpstreamError::Network(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(error: UpstreamError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
