//! # Add-Item Form
//!
//! The merchant-facing form that a successful lookup prefills.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Scan ──► lookup ──► Found(record)                                     │
//! │                         │                                               │
//! │                         ▼                                               │
//! │              ItemDraft::from_record  (text fields prefilled)           │
//! │                         │                                               │
//! │                         ▼                                               │
//! │              merchant edits name / price / description / photo         │
//! │                         │                                               │
//! │                         ▼                                               │
//! │              ItemDraft::validate ──► Item  or  ValidationError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup failure leaves the merchant with an empty draft; nothing from a
//! rejected payload ever lands in the form.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductRecord;
use crate::validation::{
    validate_description, validate_image_url, validate_price_text, validate_product_name,
};

/// Raw form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemDraft {
    #[serde(default)]
    pub name: String,

    /// Price text from the decimal keypad.
    #[serde(default)]
    pub price: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
}

impl ItemDraft {
    /// Prefills the form from a lookup result.
    pub fn from_record(record: &ProductRecord) -> Self {
        ItemDraft {
            name: record.name.clone(),
            price: record.price.to_decimal_string(),
            description: record.description.clone(),
            image_url: record.image_url.clone(),
        }
    }

    /// Checks every field and builds the item.
    ///
    /// ## Rules
    /// - name, price and description are all required (after trimming)
    /// - price follows the same decimal rules as provider prices
    /// - the image URL is optional but must be absolute when given
    pub fn validate(&self) -> Result<Item, ValidationError> {
        Ok(Item {
            name: validate_product_name(&self.name)?,
            price: validate_price_text(&self.price)?,
            description: validate_description(&self.description)?,
            image_url: validate_image_url(self.image_url.as_deref())?,
        })
    }
}

/// A validated inventory item ready to be handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub name: String,

    pub description: String,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub price: Money,

    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

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
    fn test_prefill_then_validate() {
        let draft = ItemDraft::from_record(&widget());
        assert_eq!(draft.price, "9.99");

        let item = draft.validate().unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.price.cents(), 999);
        assert_eq!(item.image_url.as_deref(), Some("https://x/i.png"));
    }

    #[test]
    fn test_merchant_edits_are_validated() {
        let mut draft = ItemDraft::from_record(&widget());
        draft.price = "12.5".to_string();
        draft.name = "  Blue Widget ".to_string();
        let item = draft.validate().unwrap();
        assert_eq!(item.name, "Blue Widget");
        assert_eq!(item.price.cents(), 1250);
    }

    #[test]
    fn test_all_text_fields_required() {
        let empty = ItemDraft::default();
        assert_eq!(
            empty.validate(),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );

        let mut draft = ItemDraft::from_record(&widget());
        draft.description = "   ".to_string();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Required {
                field: "description".to_string()
            })
        );

        let mut draft = ItemDraft::from_record(&widget());
        draft.price = String::new();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_garbage_price_is_rejected() {
        let mut draft = ItemDraft::from_record(&widget());
        draft.price = "N/A".to_string();
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_draft_deserializes_with_missing_fields() {
        let draft: ItemDraft = serde_json::from_str(r#"{"name":"Widget"}"#).unwrap();
        assert_eq!(draft.name, "Widget");
        assert!(draft.price.is_empty());
        assert!(draft.image_url.is_none());
    }
}
