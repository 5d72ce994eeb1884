//! Group Lookup
//!
//! A named cache namespace: local cache lookup, then the owning peer, then
//! the loader, populating the local cache only with locally loaded values.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::group::{Getter, GroupStats, GroupStatsSnapshot};
use crate::peers::{PeerGetter, PeerPicker};

// == Group ==
/// A cache namespace and the loader that fills it.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: CacheStore,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: GroupStats,
}

impl Group {
    // == Constructor ==
    /// Creates a standalone group. Most callers go through
    /// [`GroupRegistry::new_group`](crate::group::GroupRegistry::new_group).
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name: name.into(),
            getter,
            main_cache: CacheStore::new(cache_bytes),
            peers: OnceLock::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Binds the peer picker used to route misses. Allowed once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::RouterAlreadyRegistered(self.name.clone()))
    }

    // == Get ==
    /// Returns the value for `key` from the local cache, the owning peer or
    /// the loader, in that order.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        self.stats.record_get();
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            self.stats.record_cache_hit();
            return Ok(value);
        }

        debug!(group = %self.name, key, "cache miss");
        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    self.stats.record_peer_load();
                    return Ok(value);
                }
                Err(err) => {
                    self.stats.record_peer_error();
                    warn!(group = %self.name, key, error = %err, "failed to get from remote peer");
                }
            }
        }

        self.get_locally(key).await
    }

    // Remote values are returned to the caller but never cached here; only
    // the owning peer caches a key.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from_vec(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_local_load_error();
                return Err(CacheError::LoaderFailed {
                    key: key.to_string(),
                    source: err.into(),
                });
            }
        };

        self.stats.record_local_load();
        let value = ByteView::copy_from_slice(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    /// Counters of this group's local cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
