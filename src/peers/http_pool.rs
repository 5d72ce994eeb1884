//! HTTP Peer Pool
//!
//! Routes keys to peers over the consistent-hash ring and keeps one HTTP
//! getter per remote peer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Client;
use tracing::info;

use crate::peers::{HttpGetter, PeerGetter, PeerPicker};
use crate::ring::{HashFn, HashRing, DEFAULT_REPLICAS};

/// Path prefix under which peers serve each other.
pub const DEFAULT_BASE_PATH: &str = "/_cache/";

/// Forces a leading and trailing `/` on a base path.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Peer ids are compared without trailing slashes.
fn peer_id(url: &str) -> &str {
    url.trim_end_matches('/')
}

#[derive(Debug, Default)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer picker for a pool of HTTP peers.
///
/// Ring and getters sit behind one lock and are rebuilt wholesale by
/// [`set`](HttpPool::set).
pub struct HttpPool {
    /// This peer's base URL, e.g. `http://10.0.0.1:8001`
    self_url: String,
    base_path: String,
    replicas: usize,
    hash: Option<HashFn>,
    client: Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool for the peer reachable at `self_url`, with no members yet.
    pub fn new(self_url: impl Into<String>) -> Self {
        let self_url: String = self_url.into();
        Self {
            self_url: peer_id(&self_url).to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: None,
            client: Client::new(),
            state: Mutex::new(PoolState::default()),
        }
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = Some(hash);
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    // == Set ==
    /// Replaces the pool's membership. `peers` should include this peer.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| {
                let peer: String = peer.into();
                peer_id(&peer).to_string()
            })
            .collect();
        let state = self.build_state(&peers);

        *self.state.lock() = state;
        info!("[Server {}] peers set to {:?}", self.self_url, peers);
    }

    // == Remove Peer ==
    /// Drops one peer, rebuilding the ring from the remaining members.
    ///
    /// Returns false if the peer was not a member.
    pub fn remove_peer(&self, peer: &str) -> bool {
        let peer = peer_id(peer);
        let mut state = self.state.lock();
        if !state.ring.remove(peer) {
            return false;
        }
        state.getters.remove(peer);
        info!("[Server {}] removed peer {}", self.self_url, peer);
        true
    }

    /// Current members, in the order they were set.
    pub fn peers(&self) -> Vec<String> {
        self.state.lock().ring.peers().to_vec()
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn build_state(&self, peers: &[String]) -> PoolState {
        let mut ring = HashRing::new(self.replicas, self.hash.clone());
        let mut getters = HashMap::with_capacity(peers.len());

        for peer in peers {
            if getters.contains_key(peer) {
                continue;
            }
            ring.add([peer.clone()]);
            let base_url = format!("{}{}", peer, self.base_path);
            getters.insert(
                peer.clone(),
                Arc::new(HttpGetter::new(base_url, self.client.clone())),
            );
        }

        PoolState { ring, getters }
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }

        info!("[Server {}] Pick peer {}", self.self_url, peer);
        state
            .getters
            .get(peer)
            .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
    }
}

impl fmt::Debug for HttpPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPool")
            .field("self_url", &self.self_url)
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .field("state", &*self.state.lock())
            .finish()
    }
}
