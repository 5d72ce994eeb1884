//! Consistent Hash Ring Module
//!
//! Maps keys to peer identifiers through virtual replicas on a 32-bit ring.
//! Every peer computes ownership locally, so identical membership and hash
//! function must produce identical answers everywhere.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Hash function used to place keys and virtual replicas on the ring.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Virtual replicas per peer when none is configured.
pub const DEFAULT_REPLICAS: usize = 50;

fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// == Hash Ring ==
/// Consistent-hash ring of peer identifiers.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual hashes
    keys: Vec<u32>,
    /// Virtual hash -> real peer id
    hash_map: HashMap<u32, String>,
    /// Peers in the order they were added, duplicates included
    peers: Vec<String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or_else(|| Arc::new(crc32_ieee) as HashFn),
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
            peers: Vec::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for each peer on the ring.
    ///
    /// Adding a peer twice adds its replicas twice.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for peer in peers {
            let peer = peer.into();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.keys.push(hash);
                self.hash_map.insert(hash, peer.clone());
            }
            self.peers.push(peer);
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Returns the peer owning `key`: the first virtual node clockwise from
    /// the key's hash, wrapping to the start of the ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let virtual_hash = self.keys[idx % self.keys.len()];

        self.hash_map.get(&virtual_hash).map(String::as_str)
    }

    // == Remove ==
    /// Drops every occurrence of `peer` by rebuilding the ring from the rest.
    ///
    /// Returns false if the peer was not on the ring.
    pub fn remove(&mut self, peer: &str) -> bool {
        if !self.peers.iter().any(|p| p == peer) {
            return false;
        }

        let remaining: Vec<String> = self.peers.drain(..).filter(|p| p != peer).collect();
        self.keys.clear();
        self.hash_map.clear();
        self.add(remaining);
        true
    }

    /// Peers currently on the ring, in insertion order.
    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .field("peers", &self.peers)
            .finish()
    }
}
