//! Membership service
//!
//! Read side of the membership store, for the website's roster pages.

use clan_core::Snowflake;
use tracing::instrument;

use crate::dto::MembershipResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A community's roster, leaders first, then by display name
    #[instrument(skip(self))]
    pub async fn list_community(&self, community_id: &str) -> ServiceResult<Vec<MembershipResponse>> {
        if community_id.trim().is_empty() {
            return Err(ServiceError::validation("community_id must not be empty"));
        }

        let members = self.ctx.membership_repo().find_by_community(community_id).await?;
        Ok(members.into_iter().map(MembershipResponse::from).collect())
    }

    /// One membership
    #[instrument(skip(self))]
    pub async fn get_member(&self, community_id: &str, member_id: Snowflake) -> ServiceResult<MembershipResponse> {
        self.ctx
            .membership_repo()
            .find(community_id, member_id)
            .await?
            .map(MembershipResponse::from)
            .ok_or_else(|| ServiceError::not_found("Membership", format!("{community_id}/{member_id}")))
    }
}
