//! Rank - a member's ordered standing within a community group

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Member rank, ordered from highest authority to lowest.
///
/// `Ord` follows [`Rank::priority`], so sorting a list of ranks puts
/// leaders first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Leader,
    CoLeader,
    Elder,
    #[default]
    Member,
}

impl Rank {
    /// All ranks in priority order
    pub const ALL: [Rank; 4] = [Rank::Leader, Rank::CoLeader, Rank::Elder, Rank::Member];

    /// Sort priority: `Leader = 0` … `Member = 3`
    #[inline]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Leader => 0,
            Self::CoLeader => 1,
            Self::Elder => 2,
            Self::Member => 3,
        }
    }

    /// Canonical name, as stored and as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leader => "Leader",
            Self::CoLeader => "CoLeader",
            Self::Elder => "Elder",
            Self::Member => "Member",
        }
    }

    /// Match a platform role name to a rank.
    ///
    /// Role names are free text on the platform, so this ignores case,
    /// spaces, dashes and underscores: "Co-Leader", "co leader" and
    /// "COLEADER" all map to [`Rank::CoLeader`].
    pub fn from_role_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "leader" => Some(Self::Leader),
            "coleader" => Some(Self::CoLeader),
            "elder" => Some(Self::Elder),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Highest-authority rank in a set, or `Member` for an empty set
    pub fn highest<I>(ranks: I) -> Self
    where
        I: IntoIterator<Item = Rank>,
    {
        ranks.into_iter().min().unwrap_or(Self::Member)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rank| rank.as_str() == s)
            .ok_or_else(|| DomainError::InvalidRank(s.to_string()))
    }
}
