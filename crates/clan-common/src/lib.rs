//! # clan-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, CronSecret, JwtService};
pub use config::{
    parse_sync_groups, AppConfig, AppSettings, ConfigError, CorsConfig, CronConfig, DatabaseConfig,
    Environment, JwtConfig, PlatformConfig, RateLimitConfig, RedisConfig, ServerConfig, SyncConfig,
    SyncGroup, WatcherConfig,
};
pub use error::{domain_status_code, AppError, AppResult};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
