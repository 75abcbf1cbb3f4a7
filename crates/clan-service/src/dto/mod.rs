//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities and outcomes to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{SyncRequest, UpdateRankRequest};
pub use responses::{
    ApiResponse, HealthChecks, HealthResponse, MembershipResponse, RankResponse, ReadinessResponse,
    SyncResponse,
};
