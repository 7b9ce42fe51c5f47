//! Error types for the inference gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error types for gateway operations.
///
/// Every failure surfaces to the caller as a distinguishable kind; nothing is
/// swallowed. `UpstreamUnavailable` is the only kind eligible for retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream invocation failed: {0}")]
    UpstreamInvocationFailed(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::UpstreamInvocationFailed(_) => {
                (StatusCode::BAD_GATEWAY, "upstream_invocation_failed")
            }
            Error::UpstreamUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable")
            }
            Error::SerializationError(_) => (StatusCode::BAD_GATEWAY, "serialization_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
