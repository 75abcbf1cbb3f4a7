//! Entity to model mappers
//!
//! Conversions between domain entities (clan-core) and database models.

mod membership;

pub use membership::{member_ids, MembershipUpsert};
