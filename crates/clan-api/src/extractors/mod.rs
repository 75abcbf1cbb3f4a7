//! Axum extractors for request handling
//!
//! Custom extractors for authentication and validation.

mod auth;
mod cron;
mod validated;

pub use auth::{AuthActor, OptionalAuthActor};
pub use cron::CronAuth;
pub use validated::ValidatedJson;
