//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use clan_core::Rank;
use serde::Serialize;

use crate::services::MemberFailure;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Sync Responses
// ============================================================================

/// Result of a manual sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub count: usize,
    pub upserted: usize,
    pub removed: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<MemberFailure>,
}

// ============================================================================
// Membership Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub ok: bool,
}

/// One membership as shown on the website
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub member_id: String,
    pub community_id: String,
    /// Display name, or the handle when there is none
    pub name: String,
    pub display_name: Option<String>,
    pub handle: String,
    pub rank: Rank,
    pub rank_priority: u8,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    /// `None` when running with the in-process lock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<String>,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    /// `redis_healthy` is `None` when Redis is not configured
    pub fn ready(database_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let all_healthy = database_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy),
                redis: redis_healthy.map(health_label),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
