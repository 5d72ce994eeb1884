//! Response DTOs for the node front-end
//!
//! Defines the JSON bodies of the stats and health endpoints.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::group::{Group, GroupStatsSnapshot};

/// Counters of one group (part of GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group name
    pub name: String,
    /// How lookups were answered
    pub group: GroupStatsSnapshot,
    /// Local cache counters
    pub cache: CacheStats,
    /// Local cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Snapshots a group's counters
    pub fn from_group(group: &Group) -> Self {
        let cache = group.cache_stats();
        Self {
            name: group.name().to_string(),
            group: group.stats(),
            hit_rate: cache.hit_rate(),
            cache,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// One entry per registered group, sorted by name
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GetterFn;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_group_stats_response() {
        let group = Group::new(
            "scores",
            1024,
            Arc::new(GetterFn(|_: &str| -> anyhow::Result<Vec<u8>> {
                Ok(b"630".to_vec())
            })),
        );
        group.get("Tom").await.unwrap();
        group.get("Tom").await.unwrap();

        let resp = GroupStatsResponse::from_group(&group);
        assert_eq!(resp.name, "scores");
        assert_eq!(resp.group.local_loads, 1);
        assert_eq!(resp.cache.hits, 1);
        assert!((resp.hit_rate - 0.5).abs() < 0.001);

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"cache_hits\":1"));
        assert!(json.contains("\"used_bytes\":6"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
