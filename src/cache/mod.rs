//! Cache Module
//!
//! Provides the byte-budgeted LRU engine and its thread-safe wrapper.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::{ByteLen, LruCache, OnEvicted};
pub use stats::CacheStats;
pub use store::CacheStore;
