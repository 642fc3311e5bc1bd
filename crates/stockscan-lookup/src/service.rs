//! # Lookup Service
//!
//! Resolves a barcode to a [`ProductRecord`] through the configured provider.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          lookup_code("...")                             │
//! │                                 │                                       │
//! │                     Barcode::parse ──✗──► ValidationError (0 calls)     │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  Idle ──────────────────► cache hit? ──yes──► Found (0 calls)           │
//! │                                 │ no                                    │
//! │                                 ▼                                       │
//! │  AwaitingUpstream ──► timeout(provider.fetch) ◄─────────┐               │
//! │                                 │                       │ backoff       │
//! │              ┌──────────────────┼──────────────┐        │ (timeout /    │
//! │              ▼                  ▼              ▼        │  transport,   │
//! │         Found(raw)          NotFound       ProviderError┘  attempts     │
//! │              │                  │              │           left)        │
//! │         normalize ──✗──┐        │              │                        │
//! │              │         ▼        ▼              ▼                        │
//! │           Found     Failed   NotFound       Failed                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Calls share nothing but the provider's connection pool and the optional
//! cache, so any number of lookups may run concurrently.

use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Backoff;
use stockscan_core::normalize::normalize_product;
use stockscan_core::{
    Barcode, LookupResult, LookupState, ProductRecord, Symbology, ValidationError,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::LookupCache;
use crate::config::LookupConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProductProvider, ProviderResponse};
use crate::retry::RetryPolicy;

/// Default budget for one upstream attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Barcode-to-product lookup.
pub struct LookupService {
    provider: Arc<dyn ProductProvider>,
    symbologies: Vec<Symbology>,
    timeout: Duration,
    retry: RetryPolicy,
    cache: Option<LookupCache>,
}

impl LookupService {
    /// Creates a service with defaults: EAN-13, 5s timeout, no retries, no cache.
    pub fn new(provider: Arc<dyn ProductProvider>) -> Self {
        LookupService {
            provider,
            symbologies: vec![Symbology::Ean13],
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::none(),
            cache: None,
        }
    }

    /// Creates a service wired from configuration.
    pub fn from_config(provider: Arc<dyn ProductProvider>, config: &LookupConfig) -> Self {
        LookupService {
            provider,
            symbologies: config.barcode.symbologies.clone(),
            timeout: config.provider.timeout(),
            retry: RetryPolicy::from(&config.retry),
            cache: LookupCache::from_settings(&config.cache),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: LookupCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Validates raw scanner output.
    pub fn parse_barcode(&self, input: &str) -> Result<Barcode, ValidationError> {
        Barcode::parse(input, &self.symbologies)
    }

    /// Validates then looks up. Malformed input never reaches the provider.
    pub async fn lookup_code(&self, input: &str) -> Result<LookupResult, ValidationError> {
        let barcode = self.parse_barcode(input).inspect_err(|e| {
            debug!(input = %input, error = %e, "Rejected barcode");
        })?;
        Ok(self.lookup(&barcode).await)
    }

    /// Looks up a validated barcode.
    pub async fn lookup(&self, barcode: &Barcode) -> LookupResult {
        let started = Instant::now();

        if let Some(record) = self.cached(barcode).await {
            info!(
                %barcode,
                state = %LookupState::Found,
                cached = true,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Lookup complete"
            );
            return LookupResult::Found(record);
        }

        let result = match self.fetch_with_retry(barcode).await {
            Ok(ProviderResponse::NotFound) => LookupResult::NotFound,
            Ok(ProviderResponse::Found(raw)) => match normalize_product(&raw) {
                Ok(normalized) => {
                    if let Some(url) = normalized.discarded_image_url {
                        warn!(%barcode, image_url = %url, "Dropped non-absolute image URL");
                    }
                    LookupResult::Found(normalized.record)
                }
                Err(e) => {
                    let err = ProviderError::from(e);
                    LookupResult::upstream(err.failure(), err.to_string())
                }
            },
            Err(err) => LookupResult::upstream(err.failure(), err.to_string()),
        };

        if let (Some(cache), LookupResult::Found(record)) = (&self.cache, &result) {
            cache.insert(barcode.clone(), record.clone()).await;
            let entries = cache.len().await;
            debug!(%barcode, entries, "Cached record");
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            LookupResult::UpstreamError { reason, message } => warn!(
                %barcode,
                state = %result.state(),
                %reason,
                error = %message,
                elapsed_ms,
                "Lookup failed"
            ),
            _ => info!(%barcode, state = %result.state(), elapsed_ms, "Lookup complete"),
        }

        result
    }

    async fn cached(&self, barcode: &Barcode) -> Option<ProductRecord> {
        match &self.cache {
            Some(cache) => cache.get(barcode).await,
            None => None,
        }
    }

    /// One attempt plus up to `max_retries` more for retryable failures.
    async fn fetch_with_retry(&self, barcode: &Barcode) -> ProviderResult<ProviderResponse> {
        let mut backoff = self.retry.backoff();
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        loop {
            debug!(
                %barcode,
                state = %LookupState::AwaitingUpstream,
                provider = self.provider.name(),
                attempt,
                "Calling provider"
            );
            let err = match self.fetch_once(barcode).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            let wait = backoff.next_backoff().unwrap_or(self.retry.max_backoff);
            debug!(
                %barcode,
                attempt,
                max_attempts,
                error = %err,
                wait_ms = wait.as_millis() as u64,
                "Retrying provider call"
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    async fn fetch_once(&self, barcode: &Barcode) -> ProviderResult<ProviderResponse> {
        match tokio::time::timeout(self.timeout, self.provider.fetch(barcode)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
