//! Cache Statistics Module
//!
//! Tracks local cache performance: hits, misses, evictions and occupancy.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of one cache store's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the local cache
    pub hits: u64,
    /// Lookups that found nothing locally
    pub misses: u64,
    /// Entries dropped to stay within the byte budget
    pub evictions: u64,
    /// Current number of resident entries
    pub total_entries: usize,
    /// Current sum of key and value lengths
    pub used_bytes: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Counts a lookup answered locally.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }
}
