//! # stockscan-lookup: Product Lookup Service
//!
//! Resolves a scanned barcode to a product record by calling an upstream
//! product-data provider, and serves that over HTTP.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Scanner / client                                                      │
//! │        │ POST /lookup {"barcode"}                                       │
//! │        ▼                                                                │
//! │  ┌───────────────┐     ┌─────────────────────┐     ┌─────────────────┐ │
//! │  │ server        │────►│ LookupService       │────►│ ProductProvider │ │
//! │  │ (axum)        │     │ validate, cache,    │     │ (HttpProvider)  │ │
//! │  │ ApiError      │◄────│ timeout, retry,     │◄────│ raw JSON        │ │
//! │  └───────────────┘     │ normalize           │     └────────┬────────┘ │
//! │                        └─────────────────────┘              │          │
//! │                                                             ▼          │
//! │                                                  upstream product API  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - `LookupConfig` (TOML file + env overrides)
//! - [`error`] - Provider and config error types
//! - [`provider`] - `ProductProvider` trait
//! - [`http_provider`] - reqwest-backed provider with a bounded pool
//! - [`retry`] - Backoff policy for retryable failures
//! - [`cache`] - Optional TTL cache of found records
//! - [`service`] - `LookupService` orchestrator
//! - [`api`] - HTTP error body
//! - [`server`] - axum router
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockscan_lookup::{HttpProvider, LookupConfig, LookupService};
//!
//! let config = LookupConfig::load(None)?;
//! let provider = Arc::new(HttpProvider::new(&config.provider)?);
//! let service = LookupService::from_config(provider, &config);
//!
//! match service.lookup_code("0123456789012").await? {
//!     LookupResult::Found(record) => println!("{} {}", record.name, record.price),
//!     LookupResult::NotFound => println!("unknown product"),
//!     LookupResult::UpstreamError { reason, .. } => println!("failed: {}", reason),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http_provider;
pub mod provider;
pub mod retry;
pub mod server;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{ApiError, ErrorKind};
pub use cache::LookupCache;
pub use config::LookupConfig;
pub use error::{ConfigError, ProviderError, ProviderResult};
pub use http_provider::HttpProvider;
pub use provider::{ProductProvider, ProviderResponse};
pub use retry::RetryPolicy;
pub use server::router;
pub use service::LookupService;
