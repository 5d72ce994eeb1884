//! Cache Store Module
//!
//! Locked wrapper around the LRU engine, holding [`ByteView`] values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, CacheStats, LruCache, OnEvicted};

#[derive(Debug, Default)]
struct Inner {
    lru: Option<LruCache<ByteView>>,
    stats: CacheStats,
}

// == Cache Store ==
/// A byte-budgeted LRU cache guarded by a single mutex.
///
/// The engine is built on the first `add`, so a store that was never written
/// to costs nothing and answers every `get` with a miss.
#[derive(Debug, Default)]
pub struct CacheStore {
    inner: Mutex<Inner>,
    evictions: Arc<AtomicU64>,
    cache_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with the given byte budget (0 = unbounded).
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            evictions: Arc::new(AtomicU64::new(0)),
            cache_bytes,
        }
    }

    // == Add ==
    /// Inserts or replaces `key`, evicting older entries to respect the budget.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let lru = inner.lru.get_or_insert_with(|| {
            let evictions = self.evictions.clone();
            let on_evicted: OnEvicted<ByteView> = Box::new(move |key, _value| {
                evictions.fetch_add(1, Ordering::Relaxed);
                debug!(key, "evicted from local cache");
            });
            LruCache::new(self.cache_bytes, Some(on_evicted))
        });
        lru.add(key.to_string(), value);
    }

    // == Get ==
    /// Returns a handle on the cached value and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let found = inner.lru.as_mut().and_then(|lru| lru.get(key).cloned());
        match found {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        found
    }

    // == Stats ==
    /// Returns a snapshot of the store's counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let (total_entries, used_bytes) = inner
            .lru
            .as_ref()
            .map(|lru| (lru.len(), lru.used_bytes()))
            .unwrap_or((0, 0));

        CacheStats {
            evictions: self.evictions.load(Ordering::Relaxed),
            total_entries,
            used_bytes,
            ..inner.stats.clone()
        }
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, |lru| lru.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
