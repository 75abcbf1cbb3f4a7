//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context, the auth checks and the health probes.

use std::sync::Arc;

use clan_cache::RedisPool;
use clan_common::{AppConfig, CronSecret, JwtService};
use clan_db::PgPool;
use clan_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    jwt_service: Arc<JwtService>,
    cron_secret: CronSecret,
    /// Probed by the readiness check
    pool: PgPool,
    /// `None` when syncs use the in-process lock
    redis_pool: Option<RedisPool>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig, pool: PgPool, redis_pool: Option<RedisPool>) -> Self {
        let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
        let cron_secret = CronSecret::new(config.cron.secret.clone());

        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            jwt_service: Arc::new(jwt_service),
            cron_secret,
            pool,
            redis_pool,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn cron_secret(&self) -> &CronSecret {
        &self.cron_secret
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("config", &"AppConfig")
            .field("cron_secret", &self.cron_secret)
            .field("redis", &self.redis_pool.is_some())
            .finish()
    }
}
