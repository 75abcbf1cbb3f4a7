use async_trait::async_trait;

use crate::entities::RosterMember;
use crate::traits::RepoResult;
use crate::value_objects::Snowflake;

/// Read and write access to a platform group's live roster
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Full current roster of a group
    ///
    /// Fails with [`DomainError::SourceUnavailable`](crate::DomainError::SourceUnavailable)
    /// when the platform cannot be reached or answers with an error.
    async fn list_members(&self, group_id: Snowflake) -> RepoResult<Vec<RosterMember>>;

    /// Whether the bot may change this member's group nickname
    async fn can_manage(&self, group_id: Snowflake, member_id: Snowflake) -> RepoResult<bool>;

    /// Set a member's group nickname
    async fn set_profile_name(&self, group_id: Snowflake, member_id: Snowflake, name: &str) -> RepoResult<()>;
}
