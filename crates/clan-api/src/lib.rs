//! # clan-api
//!
//! REST API server built with Axum: manual syncs, rank overrides, the
//! community roster and the scheduler's sweep trigger.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
