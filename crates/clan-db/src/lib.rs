//! # clan-db
//!
//! Database layer implementing the membership store with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - [`PgMembershipRepository`], the `MembershipRepository` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clan_db::{create_pool, run_migrations, PgMembershipRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&config.database).await?;
//!     run_migrations(&pool).await?;
//!     let repo = PgMembershipRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool};
pub use repositories::PgMembershipRepository;
