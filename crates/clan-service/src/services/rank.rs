//! Rank service
//!
//! Manual rank overrides from the website. Only the rank column moves; names
//! stay whatever the last sync wrote.

use clan_core::{Actor, DomainError, Rank, Snowflake};
use serde::Serialize;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Result of a rank update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankUpdate {
    pub ok: bool,
    /// 0 when no such membership exists
    pub rows_affected: u64,
}

/// Rank service
pub struct RankService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RankService<'a> {
    /// Create a new RankService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set one member's rank in one community
    ///
    /// Checks the actor, then the rank name, and only then writes.
    #[instrument(skip(self, actor))]
    pub async fn update_rank(
        &self,
        actor: Option<&Actor>,
        member_id: Snowflake,
        community_id: &str,
        rank: &str,
    ) -> ServiceResult<RankUpdate> {
        let actor = actor.ok_or(DomainError::Unauthorized)?;
        let rank: Rank = rank.parse()?;

        let rows_affected = self
            .ctx
            .membership_repo()
            .update_rank(community_id, member_id, rank)
            .await?;

        info!(
            actor = %actor.id,
            community_id = %community_id,
            member_id = %member_id,
            rank = %rank,
            rows_affected,
            "Rank updated"
        );

        Ok(RankUpdate {
            ok: true,
            rows_affected,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::ServiceError;
    use crate::testing::{context, FakeMembershipRepo, FakeRoster};
    use clan_core::Membership;

    fn repo_with_joe() -> Arc<FakeMembershipRepo> {
        Arc::new(FakeMembershipRepo::with_rows([Membership::new(
            "farm-1",
            Snowflake::new(1),
            Some("FarmerJoe".to_string()),
            "joe",
            Rank::Member,
        )]))
    }

    #[tokio::test]
    async fn test_update_rank_changes_only_rank() {
        let repo = repo_with_joe();
        let ctx = context(&repo, &Arc::new(FakeRoster::default()));
        let actor = Actor::new("admin-1");

        let update = RankService::new(&ctx)
            .update_rank(Some(&actor), Snowflake::new(1), "farm-1", "Elder")
            .await
            .unwrap();
        assert_eq!(update, RankUpdate { ok: true, rows_affected: 1 });

        let row = &repo.rows("farm-1")[0];
        assert_eq!(row.rank, Rank::Elder);
        assert_eq!(row.display_name.as_deref(), Some("FarmerJoe"));
        assert_eq!(row.handle, "joe");
    }

    #[tokio::test]
    async fn test_invalid_rank_is_rejected_without_write() {
        let repo = repo_with_joe();
        let ctx = context(&repo, &Arc::new(FakeRoster::default()));
        let actor = Actor::new("admin-1");

        let err = RankService::new(&ctx)
            .update_rank(Some(&actor), Snowflake::new(1), "farm-1", "SuperLeader")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidRank(_))));
        assert_eq!(err.status_code(), 400);
        assert_eq!(repo.rows("farm-1")[0].rank, Rank::Member);
    }

    #[tokio::test]
    async fn test_missing_actor_is_unauthorized() {
        let repo = repo_with_joe();
        let ctx = context(&repo, &Arc::new(FakeRoster::default()));

        // Checked before the rank, so even a bad rank reports 401
        let err = RankService::new(&ctx)
            .update_rank(None, Snowflake::new(1), "farm-1", "Nope")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 401);
        assert_eq!(repo.rows("farm-1")[0].rank, Rank::Member);
    }

    #[tokio::test]
    async fn test_unknown_member_is_a_noop() {
        let repo = repo_with_joe();
        let ctx = context(&repo, &Arc::new(FakeRoster::default()));
        let actor = Actor::new("admin-1");

        let update = RankService::new(&ctx)
            .update_rank(Some(&actor), Snowflake::new(404), "farm-1", "Leader")
            .await
            .unwrap();

        assert_eq!(update, RankUpdate { ok: true, rows_affected: 0 });
        assert_eq!(repo.ids("farm-1"), vec![1]);
    }
}
