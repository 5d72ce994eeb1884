//! Peer capability traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Fetches a value for a group and key from one specific remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer's getter, or None when the key belongs to this
    /// process or no peers are known. Must never return the local peer.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
