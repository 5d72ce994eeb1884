//! HTTP Peer Transport
//!
//! Fetches values from a remote peer's serving surface with reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// Client for one remote peer, rooted at `<peer><base_path>`.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: Client,
}

impl HttpGetter {
    /// Creates a getter for `base_url`, e.g. `http://10.0.0.2:8001/_cache/`.
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `<base_url><group>/<key>` with each part escaped as a single
    /// path segment.
    pub fn url_for(&self, group: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CacheError::InvalidPeerUrl(format!("{}: {}", self.base_url, e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| CacheError::InvalidPeerUrl(self.base_url.clone()))?;
            segments.pop_if_empty().push(group).push(key);
        }
        Ok(url)
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key)?;
        debug!(%url, "fetching from peer");

        let res = self.client.get(url).send().await?;
        if res.status() != StatusCode::OK {
            return Err(CacheError::RemoteStatus(res.status()));
        }

        let body = res.bytes().await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn getter(base: &str) -> HttpGetter {
        HttpGetter::new(base, Client::new())
    }

    #[test]
    fn test_url_for_plain_key() {
        let url = getter("http://localhost:8001/_cache/")
            .url_for("scores", "Tom")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/_cache/scores/Tom");
    }

    #[test]
    fn test_url_for_escapes_segments() {
        let url = getter("http://localhost:8001/_cache/")
            .url_for("my group", "a/b?c")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8001/_cache/my%20group/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_url_for_invalid_base() {
        let result = getter("not a url").url_for("scores", "Tom");
        assert!(matches!(result, Err(CacheError::InvalidPeerUrl(_))));
    }

    #[tokio::test]
    async fn test_get_unreachable_peer_fails() {
        // Port 9 (discard) is not expected to have an HTTP server
        let result = getter("http://127.0.0.1:9/_cache/").get("scores", "Tom").await;
        assert!(matches!(
            result,
            Err(CacheError::Transport(_)) | Err(CacheError::RemoteStatus(_))
        ));
    }
}
