//! # clan-bot
//!
//! Long-running bot process: a gateway client feeding the name-policy
//! watcher, plus the interval sweep scheduler. [`PlatformSession`] ties them
//! together.

pub mod error;
pub mod events;
pub mod gateway;
pub mod protocol;
pub mod scheduler;
pub mod session;
pub mod watcher;

pub use error::{GatewayError, GatewayResult};
pub use session::PlatformSession;
