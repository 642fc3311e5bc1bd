//! # Domain Types
//!
//! Types shared by the lookup service and its callers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  ProductRecord  │   │    LookupResult      │   │  LookupState    │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  name           │   │  Found(record)       │   │  Idle           │  │
//! │  │  description    │   │  NotFound            │   │  AwaitingUp...  │  │
//! │  │  price (Money)  │   │  UpstreamError(why)  │   │  Found          │  │
//! │  │  image_url      │   │                      │   │  NotFound       │  │
//! │  └─────────────────┘   └──────────────────────┘   │  Failed         │  │
//! │                                                    └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Record
// =============================================================================

/// Normalized product attributes for one barcode.
///
/// ## Invariants
/// - `name` is non-empty after trimming
/// - `price` is never negative
/// - `image_url`, when present, is an absolute http(s) URL
///
/// ## Wire Format
/// ```json
/// { "name": "Widget", "description": "A widget", "price": 9.99, "imageURL": "https://x/i.png" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRecord {
    /// Display name, prefilled into the item form.
    pub name: String,

    /// Free-text description; empty when the provider has none.
    pub description: String,

    /// Price with two decimal places.
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub price: Money,

    /// Product photo, if the provider knows one.
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

// =============================================================================
// Upstream Failure
// =============================================================================

/// Why the provider could not produce an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpstreamFailure {
    /// The attempt exceeded its time budget.
    Timeout,
    /// Connection refused/reset, DNS failure, unexpected HTTP status.
    Transport,
    /// The provider answered with something that is not a product.
    MalformedResponse,
}

impl UpstreamFailure {
    /// Timeouts and transport failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UpstreamFailure::Timeout | UpstreamFailure::Transport)
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamFailure::Timeout => write!(f, "timeout"),
            UpstreamFailure::Transport => write!(f, "transport"),
            UpstreamFailure::MalformedResponse => write!(f, "malformed-response"),
        }
    }
}

// =============================================================================
// Lookup Result
// =============================================================================

/// Outcome of one lookup for an already-validated barcode.
///
/// Barcode validation failures are reported separately as
/// [`crate::ValidationError`] because they happen before any lookup starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The provider knows the product.
    Found(ProductRecord),

    /// The provider has no record for this barcode.
    NotFound,

    /// The provider failed; `message` carries detail for logs and callers.
    UpstreamError {
        reason: UpstreamFailure,
        message: String,
    },
}

impl LookupResult {
    /// Shorthand for an upstream failure.
    pub fn upstream(reason: UpstreamFailure, message: impl Into<String>) -> Self {
        LookupResult::UpstreamError {
            reason,
            message: message.into(),
        }
    }

    /// Returns the record if found.
    pub fn record(&self) -> Option<&ProductRecord> {
        match self {
            LookupResult::Found(record) => Some(record),
            _ => None,
        }
    }

    /// Terminal state this result represents.
    pub fn state(&self) -> LookupState {
        match self {
            LookupResult::Found(_) => LookupState::Found,
            LookupResult::NotFound => LookupState::NotFound,
            LookupResult::UpstreamError { .. } => LookupState::Failed,
        }
    }
}

// =============================================================================
// Lookup State
// =============================================================================

/// Lifecycle of a single lookup.
///
/// ## State Machine
/// ```text
///   Idle ──► AwaitingUpstream ──┬──► Found
///                               ├──► NotFound
///                               └──► Failed
/// ```
/// A cache hit goes straight from `Idle` to `Found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupState {
    Idle,
    AwaitingUpstream,
    Found,
    NotFound,
    Failed,
}

impl fmt::Display for LookupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupState::Idle => write!(f, "idle"),
            LookupState::AwaitingUpstream => write!(f, "awaiting_upstream"),
            LookupState::Found => write!(f, "found"),
            LookupState::NotFound => write!(f, "not_found"),
            LookupState::Failed => write!(f, "failed"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ProductRecord {
        ProductRecord {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Money::from_cents(999),
            image_url: Some("https://x/i.png".to_string()),
        }
    }

    #[test]
    fn test_product_record_wire_format() {
        let json = serde_json::to_value(widget()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Widget",
                "description": "A widget",
                "price": 9.99,
                "imageURL": "https://x/i.png"
            })
        );
    }

    #[test]
    fn test_missing_image_serializes_as_null() {
        let record = ProductRecord {
            image_url: None,
            ..widget()
        };
        let json = serde_json::to_value(record).unwrap();
        assert!(json["imageURL"].is_null());
    }

    #[test]
    fn test_lookup_result_state() {
        assert_eq!(LookupResult::Found(widget()).state(), LookupState::Found);
        assert_eq!(LookupResult::NotFound.state(), LookupState::NotFound);
        assert_eq!(
            LookupResult::upstream(UpstreamFailure::Timeout, "5s elapsed").state(),
            LookupState::Failed
        );
        assert!(LookupResult::NotFound.record().is_none());
    }

    #[test]
    fn test_upstream_failure_display_and_retry() {
        assert_eq!(UpstreamFailure::MalformedResponse.to_string(), "malformed-response");
        assert!(UpstreamFailure::Timeout.is_retryable());
        assert!(UpstreamFailure::Transport.is_retryable());
        assert!(!UpstreamFailure::MalformedResponse.is_retryable());
    }
}
