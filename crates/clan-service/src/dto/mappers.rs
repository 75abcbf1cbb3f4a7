//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities and service outcomes
//! to response DTOs.

use clan_core::Membership;

use crate::services::{RankUpdate, SyncOutcome};

use super::responses::{MembershipResponse, RankResponse, SyncResponse};

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            member_id: membership.member_id.to_string(),
            community_id: membership.community_id.clone(),
            name: membership.effective_name().to_string(),
            display_name: membership.display_name.clone(),
            handle: membership.handle.clone(),
            rank: membership.rank,
            rank_priority: membership.rank.priority(),
            updated_at: membership.updated_at,
        }
    }
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self::from(&membership)
    }
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        Self {
            count: outcome.count,
            upserted: outcome.upserted,
            removed: outcome.removed,
            failed: outcome.failed,
        }
    }
}

impl From<RankUpdate> for RankResponse {
    fn from(update: RankUpdate) -> Self {
        Self { ok: update.ok }
    }
}
