//! Name-policy watcher
//!
//! Profile changes are fanned out to a fixed set of workers keyed by
//! member id: one member's events are handled in arrival order, different
//! members concurrently.

mod pool;

pub use pool::{WatcherHandle, WatcherPool};
