//! Member handlers
//!
//! Rank overrides and the community roster listing.

use axum::{
    extract::{Path, State},
    Json,
};
use clan_core::Snowflake;
use clan_service::dto::{MembershipResponse, RankResponse, UpdateRankRequest};
use clan_service::{MembershipService, RankService};

use crate::extractors::{AuthActor, OptionalAuthActor, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Set a member's rank
///
/// POST /members/rank
///
/// The actor is optional at the HTTP layer so that the rank service
/// reports the missing actor itself.
pub async fn update_rank(
    State(state): State<AppState>,
    OptionalAuthActor(actor): OptionalAuthActor,
    ValidatedJson(req): ValidatedJson<UpdateRankRequest>,
) -> ApiResult<Json<RankResponse>> {
    let update = RankService::new(state.service_context())
        .update_rank(actor.as_ref(), req.member_id, &req.community_id, &req.rank)
        .await?;

    Ok(Json(RankResponse::from(update)))
}

/// List a community's members
///
/// GET /communities/{community_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    _auth: AuthActor,
    Path(community_id): Path<String>,
) -> ApiResult<Json<Vec<MembershipResponse>>> {
    let members = MembershipService::new(state.service_context())
        .list_community(&community_id)
        .await?;
    Ok(Json(members))
}

/// Get one community member
///
/// GET /communities/{community_id}/members/{member_id}
pub async fn get_member(
    State(state): State<AppState>,
    _auth: AuthActor,
    Path((community_id, member_id)): Path<(String, String)>,
) -> ApiResult<Json<MembershipResponse>> {
    let member_id = Snowflake::parse(&member_id).map_err(|_| ApiError::invalid_path("Invalid member_id format"))?;

    let member = MembershipService::new(state.service_context())
        .get_member(&community_id, member_id)
        .await?;
    Ok(Json(member))
}
