//! Authentication utilities

mod cron;
mod jwt;

pub use cron::CronSecret;
pub use jwt::{Claims, JwtService};
