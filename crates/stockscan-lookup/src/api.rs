//! # API Error Type
//!
//! What an HTTP caller sees when a lookup does not produce a record.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Outcome                          Status   kind                         │
//! │  ───────                          ──────   ────                         │
//! │  ValidationError / bad JSON body   400     VALIDATION_ERROR             │
//! │  NotFound                          404     NOT_FOUND                    │
//! │  UpstreamError(timeout)            504     UPSTREAM_TIMEOUT             │
//! │  UpstreamError(transport)          502     UPSTREAM_TRANSPORT           │
//! │  UpstreamError(malformed-response) 502     UPSTREAM_MALFORMED_RESPONSE  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! {
//!   "kind": "UPSTREAM_TIMEOUT",
//!   "message": "provider timed out after 5000 ms",
//!   "retryable": true
//! }
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use stockscan_core::{UpstreamFailure, ValidationError};

/// Error body returned by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error kind
    pub kind: ErrorKind,

    /// Human-readable message
    pub message: String,

    /// Whether the same request may succeed if sent again
    pub retryable: bool,
}

/// Error kinds for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad barcode or request body (400)
    ValidationError,

    /// No product for this barcode (404)
    NotFound,

    /// Provider did not answer in time (504)
    UpstreamTimeout,

    /// Provider unreachable or answered with an error status (502)
    UpstreamTransport,

    /// Provider answered with something that is not a product (502)
    UpstreamMalformedResponse,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::UpstreamTransport | ErrorKind::UpstreamMalformedResponse => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::UpstreamTimeout | ErrorKind::UpstreamTransport)
    }
}

impl From<UpstreamFailure> for ErrorKind {
    fn from(reason: UpstreamFailure) -> Self {
        match reason {
            UpstreamFailure::Timeout => ErrorKind::UpstreamTimeout,
            UpstreamFailure::Transport => ErrorKind::UpstreamTransport,
            UpstreamFailure::MalformedResponse => ErrorKind::UpstreamMalformedResponse,
        }
    }
}

impl ApiError {
    /// Creates an error; `retryable` follows from the kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
            retryable: kind.is_retryable(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::ValidationError, message)
    }

    pub fn not_found(barcode: &str) -> Self {
        ApiError::new(
            ErrorKind::NotFound,
            format!("no product for barcode {}", barcode),
        )
    }

    pub fn upstream(reason: UpstreamFailure, message: impl Into<String>) -> Self {
        ApiError::new(reason.into(), message)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_screaming_snake() {
        let err = ApiError::upstream(UpstreamFailure::MalformedResponse, "bad price");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "UPSTREAM_MALFORMED_RESPONSE");
        assert_eq!(json["message"], "bad price");
        assert_eq!(json["retryable"], false);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("0123456789012").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::upstream(UpstreamFailure::Timeout, "x").status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::upstream(UpstreamFailure::Transport, "x").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::upstream(UpstreamFailure::MalformedResponse, "x").status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_only_timeout_and_transport_are_retryable() {
        assert!(ApiError::upstream(UpstreamFailure::Timeout, "x").retryable);
        assert!(ApiError::upstream(UpstreamFailure::Transport, "x").retryable);
        assert!(!ApiError::upstream(UpstreamFailure::MalformedResponse, "x").retryable);
        assert!(!ApiError::not_found("x").retryable);
        assert!(!ApiError::validation("x").retryable);
    }

    #[test]
    fn test_from_validation_error() {
        let err: ApiError = ValidationError::ChecksumMismatch {
            expected: 2,
            actual: 3,
        }
        .into();
        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert!(err.message.contains("check digit"));
    }
}
