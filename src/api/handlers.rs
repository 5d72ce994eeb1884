//! API Handlers
//!
//! HTTP request handlers for the peer-serving surface and the node front-end.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::ByteView;
use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{ApiQuery, GroupStatsResponse, HealthResponse, StatsResponse};
use crate::peers::{normalize_base_path, DEFAULT_BASE_PATH};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Groups served by this node
    pub registry: Arc<GroupRegistry>,
    /// Prefix of the peer-serving surface, with leading and trailing `/`
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState serving peers under `base_path`.
    pub fn new(registry: Arc<GroupRegistry>, base_path: &str) -> Self {
        Self {
            registry,
            base_path: normalize_base_path(base_path),
        }
    }

    /// Creates a new AppState serving peers under the default base path.
    pub fn with_default_base_path(registry: Arc<GroupRegistry>) -> Self {
        Self::new(registry, DEFAULT_BASE_PATH)
    }
}

fn octet_stream(view: ByteView) -> Response {
    let body: Bytes = view.to_bytes();
    ([(header::CONTENT_TYPE, "application/octet-stream")], body).into_response()
}

/// Handler for GET <base_path><group>/<key>
///
/// Serves a value to another peer. The first path segment names the group,
/// everything after it is the key.
pub async fn peer_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response> {
    info!("GET {}{}", state.base_path, path);

    let (group_name, key) = path
        .trim_start_matches('/')
        .split_once('/')
        .ok_or_else(|| CacheError::BadRequest(format!("expected <group>/<key>, got '{}'", path)))?;

    let group = state
        .registry
        .get_group(group_name)
        .ok_or_else(|| CacheError::NoSuchGroup(group_name.to_string()))?;

    let view = group.get(key).await?;
    Ok(octet_stream(view))
}

/// Handler for GET <base_path> with no group or key
pub async fn bad_peer_request() -> CacheError {
    CacheError::BadRequest("expected <group>/<key>".to_string())
}

/// Handler for GET /api?group=<group>&key=<key>
///
/// Front-end lookup through the full cache, peer and loader chain.
pub async fn api_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let group = state
        .registry
        .get_group(&query.group)
        .ok_or_else(|| CacheError::NoSuchGroup(query.group.clone()))?;

    let view = group.get(&query.key).await?;
    Ok(octet_stream(view))
}

/// Handler for GET /stats
///
/// Returns counters for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let groups = state
        .registry
        .group_names()
        .iter()
        .filter_map(|name| state.registry.get_group(name))
        .map(|group| GroupStatsResponse::from_group(&group))
        .collect();

    Json(StatsResponse { groups })
}

/// Handler for GET /health
///
/// Returns health status of the node.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
