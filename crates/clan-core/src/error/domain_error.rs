//! Errors raised by domain rules and the storage/roster ports

use thiserror::Error;

use crate::value_objects::Snowflake;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Rank name outside Leader, CoLeader, Elder, Member
    #[error("Invalid rank: {0:?}")]
    InvalidRank(String),

    /// No authenticated actor on a privileged operation
    #[error("Authentication required")]
    Unauthorized,

    /// The platform refused a nickname change for this member
    #[error("Insufficient privilege to modify member {0}")]
    InsufficientPrivilege(Snowflake),

    #[error("Roster source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRank(_) => "INVALID_RANK",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InsufficientPrivilege(_) => "INSUFFICIENT_PRIVILEGE",
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidRank(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::InsufficientPrivilege(_))
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}
