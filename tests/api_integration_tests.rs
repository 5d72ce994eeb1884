//! Integration Tests for the Peer Surface and Peer Routing
//!
//! Exercises the HTTP boundary through the router and a small cluster of
//! real nodes talking to each other over loopback.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use reqwest::Client;
use shardcache::{
    create_router, AppState, CacheError, GetterFn, Group, GroupRegistry, HashRing, HttpPool,
};
use tokio::net::TcpListener;
use tower::ServiceExt;

// == Helper Functions ==

type LoadCounts = Arc<Mutex<HashMap<String, usize>>>;

fn scores_getter(
    counts: LoadCounts,
) -> GetterFn<impl Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync> {
    GetterFn(move |key: &str| -> anyhow::Result<Vec<u8>> {
        let value = match key {
            "Tom" => "630",
            "Jack" => "589",
            "Sam" => "567",
            _ => anyhow::bail!("{} not exist", key),
        };
        *counts.lock().entry(key.to_string()).or_insert(0) += 1;
        Ok(value.as_bytes().to_vec())
    })
}

fn create_test_app() -> Router {
    let registry = Arc::new(GroupRegistry::new());
    registry
        .new_group(
            "scores",
            2 << 10,
            Arc::new(scores_getter(LoadCounts::default())),
        )
        .unwrap();
    create_router(AppState::with_default_base_path(registry))
}

async fn get_uri(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn test_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

// == HTTP Boundary Tests ==

#[tokio::test]
async fn test_peer_surface_hit() {
    let (status, body) = get_uri(create_test_app(), "/_cache/scores/Tom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "630");
}

#[tokio::test]
async fn test_peer_surface_loader_error() {
    let (status, body) = get_uri(create_test_app(), "/_cache/scores/kkk").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("not exist"), "body was {}", body);
}

#[tokio::test]
async fn test_peer_surface_unknown_group() {
    let (status, body) = get_uri(create_test_app(), "/_cache/unknowngroup/x").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "no such group: unknowngroup");
}

#[tokio::test]
async fn test_peer_surface_malformed_path() {
    let (status, _) = get_uri(create_test_app(), "/_cache/scores").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_peer_surface_empty_key() {
    let (status, body) = get_uri(create_test_app(), "/_cache/scores/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "key is required");
}

// == Cluster Tests ==

struct Node {
    url: String,
    group: Arc<Group>,
    counts: LoadCounts,
}

/// Starts `n` nodes on ephemeral loopback ports, all sharing one pool.
async fn start_cluster(n: usize) -> Vec<Node> {
    let mut listeners = Vec::new();
    for _ in 0..n {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        listeners.push((listener, url));
    }
    let urls: Vec<String> = listeners.iter().map(|(_, url)| url.clone()).collect();

    let mut nodes = Vec::new();
    for (listener, url) in listeners {
        let counts = LoadCounts::default();
        let registry = Arc::new(GroupRegistry::new());
        let group = registry
            .new_group("scores", 2 << 10, Arc::new(scores_getter(counts.clone())))
            .unwrap();

        let pool = HttpPool::new(url.clone()).with_client(test_client());
        pool.set(urls.iter().cloned());
        group.register_peers(Arc::new(pool)).unwrap();

        let app = create_router(AppState::with_default_base_path(registry));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        nodes.push(Node { url, group, counts });
    }
    nodes
}

#[tokio::test]
async fn test_cluster_routes_to_owner() {
    let nodes = start_cluster(3).await;
    let mut ring = HashRing::default();
    ring.add(nodes.iter().map(|node| node.url.clone()));

    let front = &nodes[0];
    for (key, expected) in [("Tom", "630"), ("Jack", "589"), ("Sam", "567")] {
        let view = front.group.get(key).await.unwrap();
        assert_eq!(view.to_string(), expected);

        let owner_url = ring.get(key).unwrap();
        let owner = nodes.iter().find(|node| node.url == owner_url).unwrap();

        // Only the owner ran its loader, exactly once
        for node in &nodes {
            let loads = node.counts.lock().get(key).copied().unwrap_or(0);
            if node.url == owner.url {
                assert_eq!(loads, 1, "owner {} should load {}", node.url, key);
            } else {
                assert_eq!(loads, 0, "{} should not load {}", node.url, key);
            }
        }

        // A second read is served from the owner's cache
        front.group.get(key).await.unwrap();
        assert_eq!(owner.counts.lock()[key], 1);
    }

    // The front node caches only the keys it owns
    let owned_by_front = ["Tom", "Jack", "Sam"]
        .iter()
        .filter(|key| ring.get(key) == Some(front.url.as_str()))
        .count();
    assert_eq!(front.group.cache_stats().total_entries, owned_by_front);
}

#[tokio::test]
async fn test_cluster_unknown_key_fails_everywhere() {
    let nodes = start_cluster(2).await;

    for node in &nodes {
        let err = node.group.get("kkk").await.unwrap_err();
        assert!(matches!(err, CacheError::LoaderFailed { .. }));
        assert!(err.to_string().contains("not exist"));
    }
}

#[tokio::test]
async fn test_front_api_over_the_wire() {
    let nodes = start_cluster(3).await;
    let client = test_client();

    let body = client
        .get(format!("{}/api?group=scores&key=Tom", nodes[1].url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "630");

    let response = client
        .get(format!("{}/api?group=scores&key=kkk", nodes[1].url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().await.unwrap().contains("not exist"));
}

#[tokio::test]
async fn test_dead_peer_falls_back_to_loader() {
    // Reserve a port, then close it so nothing answers there
    let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", dead.local_addr().unwrap());
    drop(dead);

    let counts = LoadCounts::default();
    let group = Group::new("scores", 2 << 10, Arc::new(scores_getter(counts.clone())));
    let pool = HttpPool::new("http://127.0.0.1:1").with_client(test_client());
    pool.set([dead_url]);
    group.register_peers(Arc::new(pool)).unwrap();

    let view = group.get("Jack").await.unwrap();
    assert_eq!(view.to_string(), "589");
    assert_eq!(counts.lock()["Jack"], 1);
    assert_eq!(group.stats().peer_errors, 1);
}
