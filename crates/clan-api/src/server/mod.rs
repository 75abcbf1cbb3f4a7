//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clan_cache::{RedisPool, SyncLockStore};
use clan_common::{AppConfig, AppError};
use clan_core::traits::GroupLock;
use clan_db::{create_pool, run_migrations, PgMembershipRepository};
use clan_platform::PlatformClient;
use clan_service::{LocalGroupLocks, ServiceContextBuilder, SyncSettings};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Lower bound for the per-request timeout
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    // Room for a full sweep plus response serialization
    let request_timeout = config.sync.sweep_deadline().max(MIN_REQUEST_TIMEOUT) + Duration::from_secs(5);

    let api = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
        request_timeout,
    )?;

    Ok(api.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let (group_lock, redis_pool): (Arc<dyn GroupLock>, Option<RedisPool>) = match &config.redis {
        Some(redis) => {
            info!("Using Redis sync locks");
            let redis_pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
            let locks = SyncLockStore::new(redis_pool.clone(), config.sync.lock_ttl());
            (Arc::new(locks), Some(redis_pool))
        }
        None => {
            warn!("REDIS_URL not set, sync locks are process-local");
            (Arc::new(LocalGroupLocks::new(config.sync.lock_ttl())), None)
        }
    };

    let platform = PlatformClient::from_config(&config.platform).map_err(|e| AppError::Config(e.to_string()))?;

    let service_context = ServiceContextBuilder::new()
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .roster(Arc::new(platform))
        .group_lock(group_lock)
        .settings(SyncSettings::from(&config.sync))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    info!(groups = config.sync.groups.len(), "Service context ready");

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address {}: {e}", config.api.address())))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}
