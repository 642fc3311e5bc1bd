//! # Lookup Cache
//!
//! Optional idempotent cache: same barcode → same [`ProductRecord`].
//!
//! ## Rules
//! - Only `Found` records are stored; NotFound and failures always go upstream
//! - Entries expire after `ttl`
//! - At `max_entries`, expired entries are purged first, then the oldest goes
//!
//! Timestamps use `tokio::time::Instant` so paused-clock tests can expire
//! entries without sleeping.

use std::collections::HashMap;
use std::time::Duration;
use stockscan_core::{Barcode, ProductRecord};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheSettings;

struct CacheEntry {
    record: ProductRecord,
    inserted_at: Instant,
}

/// TTL-bounded map from barcode to product record.
pub struct LookupCache {
    entries: RwLock<HashMap<Barcode, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl LookupCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        LookupCache {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Builds the cache if enabled.
    pub fn from_settings(settings: &CacheSettings) -> Option<Self> {
        settings
            .enabled
            .then(|| LookupCache::new(Duration::from_secs(settings.ttl_secs), settings.max_entries))
    }

    /// Returns a fresh record, if any.
    pub async fn get(&self, barcode: &Barcode) -> Option<ProductRecord> {
        let entries = self.entries.read().await;
        entries
            .get(barcode)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.record.clone())
    }

    /// Stores a found record.
    pub async fn insert(&self, barcode: Barcode, record: ProductRecord) {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(&barcode) {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    debug!(barcode = %oldest, "Evicting oldest cache entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            barcode,
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
