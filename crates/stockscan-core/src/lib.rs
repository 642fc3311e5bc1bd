//! # stockscan-core: Pure Business Logic for Product Lookup
//!
//! This crate holds every rule of the barcode-to-product lookup that does
//! not touch the network: barcode checksums, price parsing, normalization of
//! untrusted upstream payloads and the merchant's "add item" form.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockscan Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Scanner front-end (mobile / web / CLI)              │   │
//! │  │      Camera ──► decoded barcode ──► POST /lookup ──► form       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockscan-lookup (LookupService)                   │   │
//! │  │        provider call, timeout, retry, cache, router             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockscan-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  barcode  │  │   money   │  │ normalize │  │   item    │  │   │
//! │  │   │  EAN-13   │  │   Money   │  │ raw JSON  │  │ ItemDraft │  │   │
//! │  │   │  UPC-A    │  │ parse_... │  │  ──► rec  │  │   Item    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`barcode`] - Barcode type and GS1 check digits
//! - [`money`] - Money type with integer arithmetic and decimal parsing
//! - [`types`] - ProductRecord, LookupResult, LookupState
//! - [`normalize`] - Raw upstream attributes to ProductRecord
//! - [`item`] - The merchant's add-item form
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators
//!
//! ## Example Usage
//!
//! ```rust
//! use stockscan_core::barcode::{Barcode, Symbology};
//! use stockscan_core::money::Money;
//!
//! let barcode = Barcode::parse("0123456789012", &[Symbology::Ean13]).unwrap();
//! assert_eq!(barcode.as_str(), "0123456789012");
//!
//! let price = Money::parse_decimal("9.99").unwrap();
//! assert_eq!(price.cents(), 999);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod error;
pub mod item;
pub mod money;
pub mod normalize;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::{Barcode, Symbology};
pub use error::{NormalizeError, ValidationError};
pub use item::{Item, ItemDraft};
pub use money::Money;
pub use normalize::normalize_product;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name accepted from upstream or the item form.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a product description.
///
/// Upstream descriptions are free text scraped from retailer pages; anything
/// longer than this is treated as a malformed payload rather than truncated.
pub const MAX_DESCRIPTION_LEN: usize = 4000;
