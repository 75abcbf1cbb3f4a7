//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use clan_core::Snowflake;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// Absent means single-process deployment with in-process sync locks
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub cron: CronConfig,
    pub platform: PlatformConfig,
    pub sync: SyncConfig,
    pub watcher: WatcherConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Shared secret for the scheduled-sweep trigger
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CronConfig {
    /// Unset disables the cron endpoint
    pub secret: Option<String>,
}

/// Chat platform connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_platform_api_base")]
    pub api_base: String,
    #[serde(default = "default_platform_gateway_url")]
    pub gateway_url: String,
    pub bot_token: String,
    #[serde(default = "default_platform_timeout")]
    pub timeout_secs: u64,
}

impl PlatformConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One platform group mirrored into one internal community
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncGroup {
    pub external_id: Snowflake,
    pub internal_id: String,
}

impl FromStr for SyncGroup {
    type Err = ConfigError;

    /// Parse `external:internal`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue("SYNC_GROUPS", s.to_string());

        let (external, internal) = s.split_once(':').ok_or_else(invalid)?;
        let external_id = Snowflake::parse(external).map_err(|_| invalid())?;
        let internal_id = internal.trim();
        if internal_id.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            external_id,
            internal_id: internal_id.to_string(),
        })
    }
}

/// Parse a comma-separated `SYNC_GROUPS` list; blank entries are ignored
pub fn parse_sync_groups(raw: &str) -> Result<Vec<SyncGroup>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

/// Sync engine and sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub groups: Vec<SyncGroup>,
    #[serde(default = "default_sync_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_sweep_concurrency")]
    pub sweep_concurrency: usize,
    #[serde(default = "default_sweep_deadline")]
    pub sweep_deadline_secs: u64,
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_secs: u64,
    #[serde(default = "default_lock_wait")]
    pub lock_wait_secs: u64,
}

impl SyncConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn sweep_deadline(&self) -> Duration {
        Duration::from_secs(self.sweep_deadline_secs)
    }

    #[must_use]
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(self.lock_wait_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            interval_secs: default_sync_interval(),
            sweep_concurrency: default_sweep_concurrency(),
            sweep_deadline_secs: default_sweep_deadline(),
            lock_ttl_secs: default_lock_ttl(),
            lock_wait_secs: default_lock_wait(),
        }
    }
}

/// Name-policy watcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherConfig {
    #[serde(default = "default_watcher_workers")]
    pub workers: usize,
    #[serde(default = "default_watcher_queue")]
    pub queue_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            workers: default_watcher_workers(),
            queue_capacity: default_watcher_queue(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "clan-sync".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_platform_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_platform_gateway_url() -> String {
    "wss://gateway.discord.gg".to_string()
}

fn default_platform_timeout() -> u64 {
    10
}

fn default_sync_interval() -> u64 {
    3600
}

fn default_sweep_concurrency() -> usize {
    4
}

fn default_sweep_deadline() -> u64 {
    300
}

fn default_lock_ttl() -> u64 {
    120
}

fn default_lock_wait() -> u64 {
    30
}

fn default_watcher_workers() -> usize {
    4
}

fn default_watcher_queue() -> usize {
    256
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let groups = match env::var("SYNC_GROUPS") {
            Ok(raw) => parse_sync_groups(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections()),
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections()),
            },
            redis: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()).map(|url| RedisConfig {
                url,
                max_connections: parsed_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections()),
            }),
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: parsed_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry()),
            },
            cron: CronConfig {
                secret: env::var("CRON_SECRET").ok().filter(|s| !s.is_empty()),
            },
            platform: PlatformConfig {
                api_base: env::var("PLATFORM_API_BASE").unwrap_or_else(|_| default_platform_api_base()),
                gateway_url: env::var("PLATFORM_GATEWAY_URL")
                    .unwrap_or_else(|_| default_platform_gateway_url()),
                bot_token: env::var("PLATFORM_BOT_TOKEN")
                    .map_err(|_| ConfigError::MissingVar("PLATFORM_BOT_TOKEN"))?,
                timeout_secs: parsed_or("PLATFORM_TIMEOUT_SECS", default_platform_timeout()),
            },
            sync: SyncConfig {
                groups,
                interval_secs: parsed_or("SYNC_INTERVAL_SECS", default_sync_interval()),
                sweep_concurrency: parsed_or("SWEEP_CONCURRENCY", default_sweep_concurrency()).max(1),
                sweep_deadline_secs: parsed_or("SWEEP_DEADLINE_SECS", default_sweep_deadline()),
                lock_ttl_secs: parsed_or("SYNC_LOCK_TTL_SECS", default_lock_ttl()),
                lock_wait_secs: parsed_or("SYNC_LOCK_WAIT_SECS", default_lock_wait()),
            },
            watcher: WatcherConfig {
                workers: parsed_or("WATCHER_WORKERS", default_watcher_workers()).max(1),
                queue_capacity: parsed_or("WATCHER_QUEUE_CAPACITY", default_watcher_queue()).max(1),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second()),
                burst: parsed_or("RATE_LIMIT_BURST", default_burst()),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
