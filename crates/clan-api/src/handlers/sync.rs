//! Sync handlers
//!
//! Manual roster sync triggered by a signed-in admin.

use axum::{extract::State, Json};
use clan_service::dto::{SyncRequest, SyncResponse};
use clan_service::SyncService;
use tracing::info;

use crate::extractors::{AuthActor, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Sync one platform group into one community
///
/// POST /sync
///
/// Partial failures answer 207 with the per-member failures in
/// `error.details`.
pub async fn sync_group(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ValidatedJson(req): ValidatedJson<SyncRequest>,
) -> ApiResult<Json<SyncResponse>> {
    info!(
        actor = %actor.id,
        external_group_id = %req.external_group_id,
        community_id = %req.internal_group_id,
        "Manual sync requested"
    );

    let outcome = SyncService::new(state.service_context())
        .sync_group(req.external_group_id, &req.internal_group_id)
        .await?;

    Ok(Json(SyncResponse::from(outcome)))
}
