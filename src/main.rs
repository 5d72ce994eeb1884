//! Shardcache node
//!
//! Boots one peer: registers the demo `scores` group, joins the configured
//! pool and serves peers plus the front-end endpoints over HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shardcache::{create_router, AppState, Config, Getter, GroupRegistry, HttpPool};

/// Stand-in for a slow backing store.
struct ScoresDb {
    rows: HashMap<&'static str, &'static str>,
}

impl ScoresDb {
    fn new() -> Self {
        Self {
            rows: HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]),
        }
    }
}

#[async_trait]
impl Getter for ScoresDb {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        info!("[SlowDB] search key {}", key);
        match self.rows.get(key) {
            Some(value) => Ok(value.as_bytes().to_vec()),
            None => anyhow::bail!("{} not exist", key),
        }
    }
}

/// Main entry point for a shardcache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the `scores` group
/// 4. Build the peer pool and bind it to the group
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shardcache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, base_path={}, cache_bytes={}, replicas={}, port={}",
        config.self_url,
        config.peers,
        config.base_path,
        config.cache_bytes,
        config.replicas,
        config.server_port
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = registry.new_group("scores", config.cache_bytes, Arc::new(ScoresDb::new()))?;

    let pool = HttpPool::new(config.self_url.clone())
        .with_base_path(&config.base_path)
        .with_replicas(config.replicas);
    pool.set(config.peers.iter().cloned());
    group.register_peers(Arc::new(pool))?;

    let app = create_router(AppState::new(registry, &config.base_path));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Node listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Node shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
