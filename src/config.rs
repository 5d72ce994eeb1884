//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::peers::{normalize_base_path, DEFAULT_BASE_PATH};
use crate::ring::DEFAULT_REPLICAS;

const DEFAULT_SELF_URL: &str = "http://localhost:8001";

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// This peer's base URL as the other peers reach it
    pub self_url: String,
    /// Base URLs of every peer in the pool, this one included
    pub peers: Vec<String>,
    /// Prefix of the peer-serving surface
    pub base_path: String,
    /// Byte budget of each group's local cache
    pub cache_bytes: usize,
    /// Virtual replicas per peer on the hash ring
    pub replicas: usize,
    /// HTTP server port
    pub server_port: u16,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Splits a comma-separated peer list, dropping blanks.
fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SELF_URL` - This peer's base URL (default: http://localhost:8001)
    /// - `CACHE_PEERS` - Comma-separated peer base URLs (default: self only)
    /// - `CACHE_BASE_PATH` - Peer-serving prefix (default: /_cache/)
    /// - `CACHE_BYTES` - Per-group cache budget in bytes (default: 2048)
    /// - `CACHE_REPLICAS` - Virtual replicas per peer (default: 50)
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let self_url = env::var("CACHE_SELF_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.self_url);

        let mut peers = env::var("CACHE_PEERS")
            .map(|raw| parse_peers(&raw))
            .unwrap_or_default();
        if peers.is_empty() {
            peers.push(self_url.clone());
        }

        let base_path = env::var("CACHE_BASE_PATH")
            .map(|raw| normalize_base_path(&raw))
            .unwrap_or(defaults.base_path);

        Self {
            self_url,
            peers,
            base_path,
            cache_bytes: env_or("CACHE_BYTES", defaults.cache_bytes),
            replicas: env_or("CACHE_REPLICAS", defaults.replicas),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            self_url: DEFAULT_SELF_URL.to_string(),
            peers: vec![DEFAULT_SELF_URL.to_string()],
            base_path: DEFAULT_BASE_PATH.to_string(),
            cache_bytes: 2 << 10,
            replicas: DEFAULT_REPLICAS,
            server_port: 8001,
        }
    }
}
