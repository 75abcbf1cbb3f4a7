//! # clan-cache
//!
//! Redis layer for cross-process coordination.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Sync Locks**: Per-group lease locks so only one process syncs a group at a time
//!
//! ## Example
//!
//! ```ignore
//! use clan_cache::{RedisPool, SyncLockStore};
//! use clan_core::GroupLock;
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let locks = SyncLockStore::new(pool, Duration::from_secs(120));
//!
//! if let Some(token) = locks.try_acquire("farm-1").await? {
//!     // ... sync ...
//!     locks.release("farm-1", &token).await?;
//! }
//! ```

pub mod lock;
pub mod pool;

pub use lock::SyncLockStore;
pub use pool::{RedisPool, RedisPoolError, RedisResult};
