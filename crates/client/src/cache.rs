//! Catalog revalidation cache.
//!
//! Server-rendered catalog pages revalidate their data every 100 seconds.
//! Only anonymous catalog reads are cached; anything carrying a user's token
//! goes straight to the backend.

use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

/// Revalidation period for catalog reads.
pub const REVALIDATE_AFTER: Duration = Duration::from_secs(100);

const MAX_ENTRIES: u64 = 1_000;

/// Raw JSON responses keyed by endpoint (path plus query string).
#[derive(Clone)]
pub struct CatalogCache {
    entries: Cache<String, Value>,
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(REVALIDATE_AFTER)
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, endpoint: &str) -> Option<Value> {
        self.entries.get(endpoint).await
    }

    pub async fn insert(&self, endpoint: String, value: Value) {
        self.entries.insert(endpoint, value).await;
    }

    /// Drop everything, after a catalog mutation.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}
