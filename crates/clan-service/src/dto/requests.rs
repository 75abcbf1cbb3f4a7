//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use clan_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

/// Manual sync of one platform group into one community
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SyncRequest {
    pub external_group_id: Snowflake,

    #[validate(length(min = 1, max = 64, message = "internal_group_id must be 1-64 characters"))]
    pub internal_group_id: String,
}

/// Rank override for one membership
///
/// `rank` stays a plain string here; it is checked against the rank names
/// by the service so a bad value reports `INVALID_RANK`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRankRequest {
    pub member_id: Snowflake,

    #[validate(length(min = 1, max = 64, message = "community_id must be 1-64 characters"))]
    pub community_id: String,

    pub rank: String,
}
