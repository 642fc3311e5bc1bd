//! # Upstream Normalization
//!
//! Turns the provider's loosely-typed JSON into a [`ProductRecord`].
//!
//! ## Field Rules
//! ```text
//! ┌──────────────┬───────────────────────────┬──────────────────────────────┐
//! │ field        │ absent / null             │ present                      │
//! ├──────────────┼───────────────────────────┼──────────────────────────────┤
//! │ name         │ MissingField              │ string, non-blank, trimmed   │
//! │ description  │ ""                        │ string, trimmed              │
//! │ price        │ MissingField              │ numeric string or number ≥ 0 │
//! │ imageURL     │ None                      │ string; blank or relative    │
//! │              │                           │ URL → None (discarded)       │
//! └──────────────┴───────────────────────────┴──────────────────────────────┘
//!  Any type mismatch → WrongType. Nothing is coerced to zero.
//!  Text length is not limited here; the item form enforces its own limits.
//! ```

use serde_json::{Map, Number, Value};

use crate::error::{NormalizeError, PriceError};
use crate::money::Money;
use crate::types::ProductRecord;
use crate::validation::is_absolute_http_url;

/// A normalized record plus anything that was dropped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub record: ProductRecord,

    /// An `imageURL` string that was present but not an absolute http(s) URL.
    pub discarded_image_url: Option<String>,
}

/// Normalizes one provider payload.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use stockscan_core::normalize::normalize_product;
///
/// let raw = json!({ "name": "Widget", "price": "9.99" });
/// let normalized = normalize_product(&raw).unwrap();
/// assert_eq!(normalized.record.price.cents(), 999);
/// assert_eq!(normalized.record.description, "");
///
/// assert!(normalize_product(&json!({ "name": "Widget", "price": "N/A" })).is_err());
/// ```
pub fn normalize_product(raw: &Value) -> Result<Normalized, NormalizeError> {
    let object = raw
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(json_type(raw)))?;

    let name = required_str(object, "name")?.trim();
    if name.is_empty() {
        return Err(NormalizeError::BlankName);
    }

    let description = optional_str(object, "description")?.unwrap_or("").trim();

    let price = match present(object, "price") {
        None => return Err(NormalizeError::MissingField("price")),
        Some(Value::String(text)) => Money::parse_decimal(text)?,
        Some(Value::Number(number)) => price_from_number(number)?,
        Some(other) => {
            return Err(NormalizeError::WrongType {
                field: "price",
                expected: "a numeric string",
                actual: json_type(other),
            })
        }
    };

    let mut discarded_image_url = None;
    let image_url = match optional_str(object, "imageURL")?.map(str::trim) {
        None | Some("") => None,
        Some(url) if is_absolute_http_url(url) => Some(url.to_string()),
        Some(url) => {
            discarded_image_url = Some(url.to_string());
            None
        }
    };

    Ok(Normalized {
        record: ProductRecord {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image_url,
        },
        discarded_image_url,
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Returns the field unless it is absent or JSON null.
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, NormalizeError> {
    optional_str(object, field)?.ok_or(NormalizeError::MissingField(field))
}

fn optional_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, NormalizeError> {
    match present(object, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(NormalizeError::WrongType {
            field,
            expected: "a string",
            actual: json_type(other),
        }),
    }
}


/// Some providers send `"price": 9.99` instead of `"9.99"`.
fn price_from_number(number: &Number) -> Result<Money, PriceError> {
    if let Some(whole) = number.as_u64() {
        return Money::parse_decimal(&whole.to_string());
    }
    if let Some(whole) = number.as_i64() {
        return Err(PriceError::Negative(whole.to_string()));
    }
    match number.as_f64() {
        Some(value) if value.is_finite() => Money::parse_decimal(&value.to_string()),
        _ => Err(PriceError::NotNumeric(number.to_string())),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::item::ItemDraft;
    use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let raw = json!({
            "name": "Widget",
            "description": "A widget",
            "price": "9.99",
            "imageURL": "https://x/i.png"
        });
        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(
            normalized.record,
            ProductRecord {
                name: "Widget".to_string(),
                description: "A widget".to_string(),
                price: Money::from_cents(999),
                image_url: Some("https://x/i.png".to_string()),
            }
        );
        assert!(normalized.discarded_image_url.is_none());
    }

    #[test]
    fn test_missing_optional_fields() {
        let raw = json!({ "name": "Widget", "price": "1.00", "description": null });
        let record = normalize_product(&raw).unwrap().record;
        assert_eq!(record.description, "");
        assert_eq!(record.image_url, None);

        let raw = json!({ "name": "Widget", "price": "1.00", "imageURL": "" });
        assert_eq!(normalize_product(&raw).unwrap().record.image_url, None);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let raw = json!({ "name": "  Widget\n", "description": " x ", "price": " 2.5 " });
        let record = normalize_product(&raw).unwrap().record;
        assert_eq!(record.name, "Widget");
        assert_eq!(record.description, "x");
        assert_eq!(record.price.cents(), 250);
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let raw = json!({ "name": "Widget", "price": "N/A" });
        assert_eq!(
            normalize_product(&raw),
            Err(NormalizeError::InvalidPrice(PriceError::NotNumeric(
                "N/A".to_string()
            )))
        );

        let raw = json!({ "name": "Widget", "price": "" });
        assert!(normalize_product(&raw).is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let raw = json!({ "name": "Widget", "price": "-5.00" });
        assert!(matches!(
            normalize_product(&raw),
            Err(NormalizeError::InvalidPrice(PriceError::Negative(_)))
        ));

        let raw = json!({ "name": "Widget", "price": -5 });
        assert!(normalize_product(&raw).is_err());

        let raw = json!({ "name": "Widget", "price": -0.5 });
        assert!(normalize_product(&raw).is_err());
    }

    #[test]
    fn test_numeric_price_is_accepted() {
        let raw = json!({ "name": "Widget", "price": 9.99 });
        assert_eq!(normalize_product(&raw).unwrap().record.price.cents(), 999);

        let raw = json!({ "name": "Widget", "price": 12 });
        assert_eq!(normalize_product(&raw).unwrap().record.price.cents(), 1200);
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let raw = json!({ "name": "Widget" });
        assert_eq!(
            normalize_product(&raw),
            Err(NormalizeError::MissingField("price"))
        );

        let raw = json!({ "name": "Widget", "price": true });
        assert!(matches!(
            normalize_product(&raw),
            Err(NormalizeError::WrongType { field: "price", .. })
        ));
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(
            normalize_product(&json!({ "price": "1" })),
            Err(NormalizeError::MissingField("name"))
        );
        assert_eq!(
            normalize_product(&json!({ "name": "   ", "price": "1" })),
            Err(NormalizeError::BlankName)
        );
        assert!(matches!(
            normalize_product(&json!({ "name": 42, "price": "1" })),
            Err(NormalizeError::WrongType { field: "name", .. })
        ));
    }

    #[test]
    fn test_long_text_is_kept() {
        let name = "A".repeat(MAX_NAME_LEN + 1);
        let description = "a".repeat(MAX_DESCRIPTION_LEN + 1);
        let raw = json!({ "name": name, "price": "1.00", "description": description });

        let record = normalize_product(&raw).unwrap().record;
        assert_eq!(record.name.len(), MAX_NAME_LEN + 1);
        assert_eq!(record.description.len(), MAX_DESCRIPTION_LEN + 1);

        // The form still applies its limits to a prefilled draft
        assert!(matches!(
            ItemDraft::from_record(&record).validate(),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_wrong_description_type_is_rejected() {
        let raw = json!({ "name": "Widget", "price": "1", "description": ["a"] });
        assert!(matches!(
            normalize_product(&raw),
            Err(NormalizeError::WrongType {
                field: "description",
                actual: "an array",
                ..
            })
        ));
    }

    #[test]
    fn test_relative_image_url_is_discarded() {
        let raw = json!({ "name": "Widget", "price": "1", "imageURL": "/img/1.png" });
        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(normalized.record.image_url, None);
        assert_eq!(normalized.discarded_image_url.as_deref(), Some("/img/1.png"));

        let raw = json!({ "name": "Widget", "price": "1", "imageURL": 7 });
        assert!(normalize_product(&raw).is_err());
    }

    #[test]
    fn test_non_object_payloads() {
        assert_eq!(
            normalize_product(&json!(["Widget"])),
            Err(NormalizeError::NotAnObject("an array"))
        );
        assert_eq!(
            normalize_product(&json!("Widget")),
            Err(NormalizeError::NotAnObject("a string"))
        );
        assert_eq!(
            normalize_product(&json!({})),
            Err(NormalizeError::MissingField("name"))
        );
    }

    #[test]
    fn test_same_payload_yields_identical_records() {
        let raw = json!({ "name": "Widget", "price": "9.99", "imageURL": "https://x/i.png" });
        let a = normalize_product(&raw).unwrap().record;
        let b = normalize_product(&raw).unwrap().record;
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }
}
