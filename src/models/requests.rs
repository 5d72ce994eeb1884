//! Request DTOs for the node front-end
//!
//! Defines the query parameters accepted by the front-end endpoints.

use serde::Deserialize;

/// Query string of the front-end lookup (GET /api?group=..&key=..)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuery {
    /// Name of the group to read from
    pub group: String,
    /// The key to look up
    #[serde(default)]
    pub key: String,
}
