//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod cron;
pub mod health;
pub mod members;
pub mod sync;
