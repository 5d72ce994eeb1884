//! API Module
//!
//! HTTP handlers and routing for the peer-serving surface and node front-end.
//!
//! # Endpoints
//! - `GET <base_path><group>/<key>` - Serve a value to another peer
//! - `GET /api?group=<group>&key=<key>` - Front-end lookup
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
