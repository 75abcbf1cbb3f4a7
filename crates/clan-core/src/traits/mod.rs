//! Port traits implemented by the infrastructure crates

mod lock;
mod repositories;
mod roster;

pub use lock::{GroupLock, LockToken};
pub use repositories::{MembershipRepository, RepoResult};
pub use roster::RosterSource;
