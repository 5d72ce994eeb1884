//! Shardcache - a distributed read-through cache
//!
//! Peers share named groups, each peer owning a shard of the keyspace by
//! consistent hashing and caching it in a byte-budgeted LRU. Misses go to
//! the owning peer over HTTP, then to the group's loader.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;

pub use api::{create_router, AppState};
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFn, Group, GroupRegistry};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
pub use ring::HashRing;
