//! API Routes
//!
//! Configures the Axum router with the peer surface and front-end endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_handler, bad_peer_request, health_handler, peer_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET <base_path><group>/<key>` - Serve a value to another peer
/// - `GET /api?group=<group>&key=<key>` - Front-end lookup
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let peer_route = format!("{}*path", state.base_path);

    Router::new()
        .route(&state.base_path, get(bad_peer_request))
        .route(&peer_route, get(peer_handler))
        .route("/api", get(api_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
