//! Integration test utilities for the clan sync API
//!
//! Spawns the real API server against PostgreSQL, with a fake platform
//! REST API standing in for the chat platform.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
