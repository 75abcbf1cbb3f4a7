//! Configuration structs

mod app_config;

pub use app_config::{
    parse_sync_groups, AppConfig, AppSettings, ConfigError, CorsConfig, CronConfig, DatabaseConfig,
    Environment, JwtConfig, PlatformConfig, RateLimitConfig, RedisConfig, ServerConfig, SyncConfig,
    SyncGroup, WatcherConfig,
};
