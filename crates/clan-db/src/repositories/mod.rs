//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in clan-core.

mod error;
mod membership;

pub use membership::PgMembershipRepository;
