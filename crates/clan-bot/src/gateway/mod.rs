//! Platform gateway client

mod backoff;
mod cache;
mod client;
mod resume;
mod router;

pub use cache::ProfileCache;
pub use client::{GatewayClient, GatewayConfig};
pub use resume::ResumeState;
pub use router::{EventRouter, Routed};
