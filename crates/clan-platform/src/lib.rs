//! # clan-platform
//!
//! REST client for the chat platform hosting the clan's community group.
//! [`PlatformClient`] implements `clan_core::RosterSource`: it lists the live
//! roster (with ranks derived from role names), decides whether the bot may
//! rename a member, and writes nicknames back.

mod client;
mod error;
pub mod hierarchy;
pub mod models;

pub use client::{PlatformClient, PlatformClientConfig};
pub use error::{PlatformError, PlatformResult};
