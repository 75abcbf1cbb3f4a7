//! # clan-core
//!
//! Domain layer containing memberships, ranks, the display-name policy, and the
//! port traits the outer layers implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Actor, MemberProfile, Membership, RosterMember};
pub use error::DomainError;
pub use events::ProfileChangedEvent;
pub use traits::{GroupLock, LockToken, MembershipRepository, RepoResult, RosterSource};
pub use value_objects::{
    contains_flag_pair, parse_user, sanitize_display_name, strip_flag_pairs, ParsedName,
    Permissions, Rank, Snowflake, SnowflakeParseError, FLAG_PLACEHOLDER, UNKNOWN_NAME,
};
