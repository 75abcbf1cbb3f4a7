//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::Membership;
use crate::error::DomainError;
use crate::value_objects::{Rank, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Membership Repository
// ============================================================================

/// Membership store keyed by `(community_id, member_id)`.
///
/// Every write is a single atomic statement; implementations must not
/// read-modify-write.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert or refresh one membership row
    ///
    /// Overwrites `display_name`, `handle`, `rank` and `updated_at` when the
    /// key already exists.
    async fn upsert(&self, membership: &Membership) -> RepoResult<()>;

    /// Delete every membership of `community_id` whose member is not in `keep`
    ///
    /// Returns the number of rows removed. An empty `keep` empties the community.
    async fn delete_not_in(&self, community_id: &str, keep: &[Snowflake]) -> RepoResult<u64>;

    /// Set the rank of one membership and bump `updated_at`
    ///
    /// Returns the number of rows affected (0 or 1).
    async fn update_rank(&self, community_id: &str, member_id: Snowflake, rank: Rank) -> RepoResult<u64>;

    /// Find one membership
    async fn find(&self, community_id: &str, member_id: Snowflake) -> RepoResult<Option<Membership>>;

    /// List a community's memberships ordered by rank priority, then display name
    async fn find_by_community(&self, community_id: &str) -> RepoResult<Vec<Membership>>;
}
