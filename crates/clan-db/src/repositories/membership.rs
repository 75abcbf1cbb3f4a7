//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use clan_core::entities::Membership;
use clan_core::traits::{MembershipRepository, RepoResult};
use clan_core::value_objects::{Rank, Snowflake};

use crate::mappers::{member_ids, MembershipUpsert};
use crate::models::MembershipModel;

use super::error::{map_check_violation, map_db_error};

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self, membership), fields(community_id = %membership.community_id, member_id = %membership.member_id))]
    async fn upsert(&self, membership: &Membership) -> RepoResult<()> {
        let row = MembershipUpsert::new(membership);

        sqlx::query(
            r#"
            INSERT INTO memberships (community_id, member_id, display_name, handle, rank, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (community_id, member_id) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                handle = EXCLUDED.handle,
                rank = EXCLUDED.rank,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(row.community_id)
        .bind(row.member_id)
        .bind(row.display_name)
        .bind(row.handle)
        .bind(row.rank)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_check_violation(e, row.rank))?;

        Ok(())
    }

    #[instrument(skip(self, keep), fields(keep = keep.len()))]
    async fn delete_not_in(&self, community_id: &str, keep: &[Snowflake]) -> RepoResult<u64> {
        // `<> ALL('{}')` is true for every row, so an empty roster clears the community
        let result = sqlx::query(
            r#"
            DELETE FROM memberships
            WHERE community_id = $1 AND member_id <> ALL($2)
            "#,
        )
        .bind(community_id)
        .bind(member_ids(keep))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn update_rank(&self, community_id: &str, member_id: Snowflake, rank: Rank) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE memberships
            SET rank = $3, updated_at = NOW()
            WHERE community_id = $1 AND member_id = $2
            "#,
        )
        .bind(community_id)
        .bind(member_id.into_inner())
        .bind(rank.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_check_violation(e, rank.as_str()))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn find(&self, community_id: &str, member_id: Snowflake) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT community_id, member_id, display_name, handle, rank, updated_at
            FROM memberships
            WHERE community_id = $1 AND member_id = $2
            "#,
        )
        .bind(community_id)
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Membership::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_community(&self, community_id: &str) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT community_id, member_id, display_name, handle, rank, updated_at
            FROM memberships
            WHERE community_id = $1
            ORDER BY
                CASE rank
                    WHEN 'Leader' THEN 0
                    WHEN 'CoLeader' THEN 1
                    WHEN 'Elder' THEN 2
                    ELSE 3
                END,
                COALESCE(display_name, handle),
                member_id
            "#,
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Membership::try_from).collect()
    }
}
