//! Response DTOs for the follow API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Edge, UserId};

/// Response body for a successful follow (POST /follow/:user_id)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    /// Success message
    pub message: String,
    pub follower_id: UserId,
    pub followee_id: UserId,
    pub followed_at: DateTime<Utc>,
}

impl From<Edge> for FollowResponse {
    fn from(edge: Edge) -> Self {
        Self {
            message: "Successfully followed user".to_string(),
            follower_id: edge.follower_id,
            followee_id: edge.followee_id,
            followed_at: edge.created_at,
        }
    }
}

/// Response body for an unfollow (DELETE /follow/:user_id)
#[derive(Debug, Clone, Serialize)]
pub struct UnfollowResponse {
    /// Success message
    pub message: String,
}

impl UnfollowResponse {
    /// Creates the unfollow acknowledgement
    pub fn new() -> Self {
        Self {
            message: "Successfully unfollowed user".to_string(),
        }
    }
}

impl Default for UnfollowResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for GET /following/:user_id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatusResponse {
    /// The user being checked
    pub user_id: UserId,
    /// Whether the caller currently follows them
    pub following: bool,
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowCountsResponse {
    pub following_count: usize,
    pub followers_count: usize,
}

/// Response body for the cache stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Reads that failed and were served as misses
    pub read_errors: u64,
    /// Best-effort writes that failed
    pub write_errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            read_errors: stats.read_errors,
            write_errors: stats.write_errors,
        }
    }
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

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_response_serialize() {
        let edge = Edge::new("alice".into(), "bob".into());
        let json = serde_json::to_value(FollowResponse::from(edge)).unwrap();

        assert_eq!(json["followerId"], "alice");
        assert_eq!(json["followeeId"], "bob");
        assert!(json["message"].as_str().unwrap().contains("followed"));
    }

    #[test]
    fn test_counts_response_serialize() {
        let resp = FollowCountsResponse {
            following_count: 3,
            followers_count: 7,
        };
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["followingCount"], 3);
        assert_eq!(json["followersCount"], 7);
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            read_errors: 0,
            write_errors: 0,
        };
        let resp = CacheStatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
