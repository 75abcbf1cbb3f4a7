//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use clan_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
///
/// Redis is only checked when sync locks live there.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database = async { sqlx::query("SELECT 1").execute(state.pool()).await.is_ok() };
    let redis = async {
        match state.redis_pool() {
            Some(pool) => Some(pool.health_check().await.is_ok()),
            None => None,
        }
    };
    let (db_healthy, redis_healthy) = tokio::join!(database, redis);

    let response = ReadinessResponse::ready(db_healthy, redis_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
