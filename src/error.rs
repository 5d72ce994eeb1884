//! Error types for the distributed cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Boxed error produced by an application loader.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Lookup was attempted with an empty key
    #[error("key is required")]
    EmptyKey,

    /// The group's loader could not produce a value
    #[error("failed to load key '{key}': {source}")]
    LoaderFailed {
        key: String,
        #[source]
        source: BoxError,
    },

    /// A peer router was bound to a group that already has one
    #[error("peer router already registered for group '{0}'")]
    RouterAlreadyRegistered(String),

    /// No group is registered under this name
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// Malformed inbound peer request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request to a remote peer failed before a response arrived
    #[error("peer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote peer answered with a non-200 status
    #[error("server returned: {0}")]
    RemoteStatus(reqwest::StatusCode),

    /// Group names must be non-empty and free of `/`
    #[error("invalid group name: '{0}'")]
    InvalidGroupName(String),

    /// A peer base URL could not be turned into a request URL
    #[error("invalid peer url: {0}")]
    InvalidPeerUrl(String),
}

impl CacheError {
    /// HTTP status used when this error crosses the peer-serving boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
