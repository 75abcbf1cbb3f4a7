//! Domain entities - core business objects

mod actor;
mod membership;
mod roster;

pub use actor::Actor;
pub use membership::Membership;
pub use roster::{MemberProfile, RosterMember};
