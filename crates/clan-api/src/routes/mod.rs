//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{cron, health, members, sync};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(sync_routes())
        .merge(member_routes())
        .merge(cron_routes())
}

/// Roster sync routes
fn sync_routes() -> Router<AppState> {
    Router::new().route("/sync", post(sync::sync_group))
}

/// Membership routes
fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members/rank", post(members::update_rank))
        .route("/communities/:community_id/members", get(members::list_members))
        .route("/communities/:community_id/members/:member_id", get(members::get_member))
}

/// Scheduler routes
fn cron_routes() -> Router<AppState> {
    Router::new().route("/cron/sweep", post(cron::sweep).get(cron::sweep))
}
