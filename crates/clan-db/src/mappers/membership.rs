//! Membership entity <-> model mapper

use clan_core::entities::Membership;
use clan_core::error::DomainError;
use clan_core::value_objects::{Rank, Snowflake};

use crate::models::MembershipModel;

/// Rows are validated on the way out; the CHECK constraint keeps this from failing
impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        Ok(Membership {
            community_id: model.community_id,
            member_id: Snowflake::new(model.member_id),
            display_name: model.display_name,
            handle: model.handle,
            rank: model.rank.parse::<Rank>()?,
            updated_at: model.updated_at,
        })
    }
}

/// Bind values for the upsert statement
pub struct MembershipUpsert<'a> {
    pub community_id: &'a str,
    pub member_id: i64,
    pub display_name: Option<&'a str>,
    pub handle: &'a str,
    pub rank: &'static str,
}

impl<'a> MembershipUpsert<'a> {
    pub fn new(membership: &'a Membership) -> Self {
        Self {
            community_id: &membership.community_id,
            member_id: membership.member_id.into_inner(),
            display_name: membership.display_name.as_deref(),
            handle: &membership.handle,
            rank: membership.rank.as_str(),
        }
    }
}

/// Raw ids for a `BIGINT[]` bind
pub fn member_ids(ids: &[Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}
