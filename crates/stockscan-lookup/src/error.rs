//! # Lookup Error Types
//!
//! Error types for provider calls and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Lookup Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌───────────────────────────────────────────────┐│
//! │  │  Configuration  │  │                 Provider                      ││
//! │  │                 │  │                                               ││
//! │  │  LoadFailed     │  │  Timeout ─────────────► UpstreamFailure::     ││
//! │  │  Invalid        │  │                            Timeout            ││
//! │  │  InvalidUrl     │  │  Transport, Status ───► Transport             ││
//! │  │  ClientBuild    │  │  MalformedResponse ───► MalformedResponse     ││
//! │  └─────────────────┘  └───────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockscan_core::{NormalizeError, UpstreamFailure};
use thiserror::Error;

// =============================================================================
// Provider Error
// =============================================================================

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures of one attempt against the product-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The attempt did not finish within its time budget.
    #[error("provider timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// Connection refused/reset, DNS failure, TLS failure.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status other than 404.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// Body was not JSON, or the JSON was not a usable product.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Category reported to the caller.
    pub fn failure(&self) -> UpstreamFailure {
        match self {
            ProviderError::Timeout { .. } => UpstreamFailure::Timeout,
            ProviderError::Transport(_) | ProviderError::Status(_) => UpstreamFailure::Transport,
            ProviderError::MalformedResponse(_) => UpstreamFailure::MalformedResponse,
        }
    }

    /// Returns true if another attempt might succeed.
    ///
    /// ## Retryable Errors
    /// - Timeouts
    /// - Connection failures and 5xx/429-style statuses
    ///
    /// ## Non-Retryable Errors
    /// - Malformed responses (the provider will answer the same way again)
    pub fn is_retryable(&self) -> bool {
        self.failure().is_retryable()
    }
}

impl From<NormalizeError> for ProviderError {
    fn from(err: NormalizeError) -> Self {
        ProviderError::MalformedResponse(err.to_string())
    }
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        ConfigError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_categories() {
        assert_eq!(
            ProviderError::Timeout { after_ms: 5000 }.failure(),
            UpstreamFailure::Timeout
        );
        assert_eq!(ProviderError::Status(503).failure(), UpstreamFailure::Transport);
        assert_eq!(
            ProviderError::MalformedResponse("not json".into()).failure(),
            UpstreamFailure::MalformedResponse
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ProviderError::Timeout { after_ms: 5000 }.is_retryable());
        assert!(ProviderError::Transport("connection refused".into()).is_retryable());
        assert!(ProviderError::Status(502).is_retryable());
        assert!(!ProviderError::MalformedResponse("bad".into()).is_retryable());
    }

    #[test]
    fn test_normalize_error_is_malformed() {
        let err: ProviderError = NormalizeError::MissingField("name").into();
        assert_eq!(err.failure(), UpstreamFailure::MalformedResponse);
        assert!(err.to_string().contains("missing field 'name'"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProviderError::Timeout { after_ms: 5000 }.to_string(),
            "provider timed out after 5000 ms"
        );
        assert_eq!(ProviderError::Status(500).to_string(), "provider returned HTTP 500");
    }
}
