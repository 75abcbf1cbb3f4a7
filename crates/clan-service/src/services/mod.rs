//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] for the duration of a call and
//! talks to the outside world only through the `clan-core` port traits.

pub mod context;
pub mod error;
pub mod local_lock;
pub mod membership;
pub mod name_policy;
pub mod rank;
pub mod sweep;
pub mod sync;

pub use context::{ServiceContext, ServiceContextBuilder, SyncSettings};
pub use error::{ServiceError, ServiceResult};
pub use local_lock::LocalGroupLocks;
pub use membership::MembershipService;
pub use name_policy::{NamePolicyService, SkipReason, WatchOutcome};
pub use rank::{RankService, RankUpdate};
pub use sweep::{GroupSweepResult, SweepReport, SweepService, SweepStatus};
pub use sync::{MemberFailure, SyncError, SyncOutcome, SyncService};
