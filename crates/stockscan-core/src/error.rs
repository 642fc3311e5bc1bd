//! # Error Types
//!
//! Domain-specific error types for stockscan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockscan-core errors (this file)                                     │
//! │  ├── ValidationError  - Caller input failures (barcode, item form)     │
//! │  ├── PriceError       - Decimal price text that cannot be Money        │
//! │  └── NormalizeError   - Upstream payload that cannot be a record       │
//! │                                                                         │
//! │  stockscan-lookup errors (separate crate)                              │
//! │  ├── ProviderError    - timeout / transport / malformed-response       │
//! │  └── ApiError         - What the HTTP caller sees (serialized)         │
//! │                                                                         │
//! │  Flow: PriceError → NormalizeError → ProviderError → ApiError          │
//! │        PriceError → ValidationError ───────────────→ ApiError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, value, lengths)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are user-correctable: a rescan or a corrected form field fixes
/// them. They are never retried automatically and never reach the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., letters in a barcode, unsupported length).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Barcode check digit does not match the data digits.
    ///
    /// ## When This Occurs
    /// - Misread by the camera (one digit off)
    /// - Hand-typed code with a transposition
    #[error("barcode check digit mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// Price text could not be parsed.
    #[error("{field} is invalid: {source}")]
    InvalidPrice {
        field: String,
        #[source]
        source: PriceError,
    },
}

// =============================================================================
// Price Error
// =============================================================================

/// Reasons a decimal price string cannot become [`crate::Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Nothing but whitespace.
    #[error("price is empty")]
    Empty,

    /// Not of the form `digits[.digits]`.
    #[error("'{0}' is not a decimal number")]
    NotNumeric(String),

    /// A leading minus sign.
    #[error("'{0}' is negative")]
    Negative(String),

    /// Does not fit in the cents range.
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

// =============================================================================
// Normalize Error
// =============================================================================

/// Upstream payload shape errors.
///
/// Every variant maps to `UpstreamError(malformed-response)`; the payload is
/// discarded as a whole, never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Top-level JSON value is not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A required attribute is absent or null.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// An attribute has the wrong JSON type.
    #[error("field '{field}' must be {expected}, got {actual}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Name is present but blank.
    #[error("field 'name' is blank")]
    BlankName,

    /// Price is non-numeric, negative, or out of range.
    #[error("field 'price' is invalid: {0}")]
    InvalidPrice(#[from] PriceError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::ChecksumMismatch {
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "barcode check digit mismatch: expected 2, got 3"
        );
    }

    #[test]
    fn test_normalize_error_messages() {
        let err = NormalizeError::InvalidPrice(PriceError::NotNumeric("N/A".into()));
        assert_eq!(
            err.to_string(),
            "field 'price' is invalid: 'N/A' is not a decimal number"
        );

        let err = NormalizeError::WrongType {
            field: "description",
            expected: "a string",
            actual: "a number",
        };
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_price_error_converts_to_normalize_error() {
        let err: NormalizeError = PriceError::Negative("-5.00".into()).into();
        assert!(matches!(err, NormalizeError::InvalidPrice(_)));
    }
}
