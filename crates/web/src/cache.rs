//! Listing cache for the customer list page.
//!
//! Holds at most one entry: the full ordered customer list under
//! [`CacheKey::AllCustomers`]. Every mutation drops that entry wholesale;
//! there is no per-record invalidation.
//!
//! `moka` makes `get`/`invalidate` atomic with respect to each other, so a
//! reader observes either the previous list or a miss. Two concurrent misses
//! may both refetch and both store; the last write wins.
//!
//! Each invalidation bumps a generation counter. A reader captures the
//! generation before fetching and passes it back to [`ListingCache::store`],
//! which discards the list if an invalidation happened in between.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::models::Customer;

/// Cache key for listing data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    AllCustomers,
}

/// Cached customer list, shared without copying between requests.
pub type CustomerList = Arc<Vec<Customer>>;

/// Process-wide cache of the customer listing.
///
/// Cheaply cloneable; clones share the same underlying store.
#[derive(Clone)]
pub struct ListingCache {
    cache: Cache<CacheKey, CustomerList>,
    generation: Arc<AtomicU64>,
}

impl ListingCache {
    /// Create an empty cache. With `ttl`, the entry also expires on its own.
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        let builder = Cache::builder().max_capacity(1);
        let cache = match ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };
        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cached customer list, if present.
    pub async fn get(&self) -> Option<CustomerList> {
        let hit = self.cache.get(&CacheKey::AllCustomers).await;
        debug!(hit = hit.is_some(), "Listing cache lookup");
        hit
    }

    /// Current generation. Capture it before fetching the list to store.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a list fetched while the cache was at `generation`.
    ///
    /// Returns `false` and leaves the cache empty if it was invalidated since.
    pub async fn store(&self, generation: u64, customers: CustomerList) -> bool {
        if self.generation() != generation {
            debug!(generation, "Discarding stale customer list");
            return false;
        }
        self.cache.insert(CacheKey::AllCustomers, customers).await;

        // An invalidation may have landed between the check and the insert.
        if self.generation() != generation {
            self.cache.invalidate(&CacheKey::AllCustomers).await;
            debug!(generation, "Discarding stale customer list");
            return false;
        }
        true
    }

    /// Drop the cached list so the next read refetches.
    pub async fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.invalidate(&CacheKey::AllCustomers).await;
        debug!(generation, "Listing cache invalidated");
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(None)
    }
}
