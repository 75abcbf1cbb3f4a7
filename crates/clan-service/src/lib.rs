//! # clan-service
//!
//! Application layer: roster sync, rank updates, the scheduled sweep and the
//! display-name policy, wired against the port traits from `clan-core`.

pub mod dto;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use services::{
    LocalGroupLocks, MemberFailure, MembershipService, NamePolicyService, RankService, RankUpdate,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, SkipReason, SweepReport,
    SweepService, SweepStatus, GroupSweepResult, SyncError, SyncOutcome, SyncService, SyncSettings,
    WatchOutcome,
};
