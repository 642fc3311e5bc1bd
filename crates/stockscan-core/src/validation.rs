//! # Validation Module
//!
//! Field validators shared by the item form and upstream normalization.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end                                                    │
//! │  ├── Scanner only emits EAN-13 reads                                   │
//! │  └── Decimal keypad for the price field                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: stockscan-lookup HTTP handlers                               │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE + Barcode::parse: business rule validation            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: normalize (untrusted provider payloads)                      │
//! │  └── Same length/URL rules, failures become malformed-response         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use url::Url;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LEN` characters
///
/// ## Example
/// ```rust
/// use stockscan_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Widget ").unwrap(), "Widget");
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a required description and returns it trimmed.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(description.to_string())
}

/// Parses the price text typed into the item form.
///
/// ## Example
/// ```rust
/// use stockscan_core::validation::validate_price_text;
///
/// assert_eq!(validate_price_text("4.50").unwrap().cents(), 450);
/// assert!(validate_price_text("").is_err());
/// assert!(validate_price_text("free").is_err());
/// ```
pub fn validate_price_text(price: &str) -> ValidationResult<Money> {
    if price.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    Money::parse_decimal(price).map_err(|source| ValidationError::InvalidPrice {
        field: "price".to_string(),
        source,
    })
}

// =============================================================================
// URL Validators
// =============================================================================

/// Returns true if `candidate` is an absolute `http`/`https` URL with a host.
///
/// ## Example
/// ```rust
/// use stockscan_core::validation::is_absolute_http_url;
///
/// assert!(is_absolute_http_url("https://x/i.png"));
/// assert!(!is_absolute_http_url("/images/i.png"));
/// assert!(!is_absolute_http_url("ftp://x/i.png"));
/// ```
pub fn is_absolute_http_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Validates an optional image URL from the item form.
///
/// ## Rules
/// - Blank means "no image"
/// - Otherwise must be an absolute http(s) URL
pub fn validate_image_url(image_url: Option<&str>) -> ValidationResult<Option<String>> {
    match image_url.map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) if is_absolute_http_url(url) => Ok(Some(url.to_string())),
        Some(_) => Err(ValidationError::InvalidFormat {
            field: "imageURL".to_string(),
            reason: "must be an absolute http(s) URL".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
