//! Distributed locks

mod sync_lock;

pub use sync_lock::SyncLockStore;
