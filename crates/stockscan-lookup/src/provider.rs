//! # Product Provider
//!
//! The seam between the lookup service and whatever knows about products.
//!
//! Implementations return the provider's raw JSON untouched; turning it
//! into a [`stockscan_core::ProductRecord`] is the service's job, so every
//! provider gets the same normalization rules.

use async_trait::async_trait;
use serde_json::Value;
use stockscan_core::Barcode;

use crate::error::ProviderResult;

/// What a provider knows about one barcode.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    /// Raw, untrusted product attributes.
    Found(Value),

    /// The provider has no record for this barcode.
    NotFound,
}

/// An upstream product-data source.
///
/// ## Contract
/// - One call is one upstream request; retries belong to the caller
/// - Must not panic on any upstream behavior
/// - May be slow; the caller enforces the timeout
#[async_trait]
pub trait ProductProvider: Send + Sync {
    /// Fetches raw attributes for a validated barcode.
    async fn fetch(&self, barcode: &Barcode) -> ProviderResult<ProviderResponse>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "provider"
    }
}
