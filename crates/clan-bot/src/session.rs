//! Platform session: the bot process's single owner of the REST client,
//! the gateway connection and the background tasks
//!
//! Built once at start-up by [`PlatformSession::connect`] and run until
//! Ctrl-C by [`PlatformSession::run_until_shutdown`].

use std::sync::Arc;

use clan_cache::{RedisPool, SyncLockStore};
use clan_common::{AppConfig, AppError};
use clan_core::traits::GroupLock;
use clan_core::Snowflake;
use clan_db::{create_pool, run_migrations, PgMembershipRepository};
use clan_platform::PlatformClient;
use clan_service::{LocalGroupLocks, ServiceContext, ServiceContextBuilder, SyncSettings};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::gateway::{GatewayClient, GatewayConfig, ProfileCache};
use crate::scheduler::SweepScheduler;
use crate::watcher::WatcherPool;

pub struct PlatformSession {
    config: AppConfig,
    context: Arc<ServiceContext>,
    bot_id: Snowflake,
    cache: Arc<ProfileCache>,
}

impl std::fmt::Debug for PlatformSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformSession")
            .field("bot_id", &self.bot_id)
            .field("cached_profiles", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl PlatformSession {
    /// Connect the store and the platform client
    ///
    /// Fails early on a bad bot token: the bot's own id is fetched here.
    pub async fn connect(config: AppConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = create_pool(&config.database)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let group_lock: Arc<dyn GroupLock> = match &config.redis {
            Some(redis) => {
                let redis_pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
                Arc::new(SyncLockStore::new(redis_pool, config.sync.lock_ttl()))
            }
            None => {
                warn!("REDIS_URL not set, sync locks are process-local");
                Arc::new(LocalGroupLocks::new(config.sync.lock_ttl()))
            }
        };

        let client = PlatformClient::from_config(&config.platform).map_err(|e| AppError::Config(e.to_string()))?;
        let bot_id = client
            .bot_id()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to fetch bot identity: {e}")))?;
        info!(bot_id = %bot_id, "Platform client authenticated");

        let context = ServiceContextBuilder::new()
            .membership_repo(Arc::new(PgMembershipRepository::new(pool)))
            .roster(Arc::new(client))
            .group_lock(group_lock)
            .settings(SyncSettings::from(&config.sync))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            config,
            context: Arc::new(context),
            bot_id,
            cache: Arc::new(ProfileCache::new()),
        })
    }

    pub fn context(&self) -> &Arc<ServiceContext> {
        &self.context
    }

    /// Run the gateway, the watcher and the scheduler until Ctrl-C
    ///
    /// Returns an error when the gateway stops for good (bad token,
    /// disallowed intents) so the process exits non-zero.
    pub async fn run_until_shutdown(self) -> Result<(), AppError> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let watcher = WatcherPool::spawn(
            self.context.clone(),
            self.config.watcher.workers,
            self.config.watcher.queue_capacity,
        );

        let gateway = GatewayClient::new(
            GatewayConfig::from(&self.config.platform),
            self.cache.clone(),
            self.bot_id,
            watcher.handle(),
        );
        let mut gateway_task = tokio::spawn(gateway.run(shutdown_rx.clone()));

        let scheduler = SweepScheduler::new(self.context.clone(), self.config.sync.interval());
        let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

        let gateway_result = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
                }
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
                gateway_task.await
            }
            result = &mut gateway_task => {
                let _ = shutdown_tx.send(true);
                result
            }
        };

        if let Err(e) = scheduler_task.await {
            warn!(error = %e, "Scheduler task panicked");
        }
        // The gateway task has dropped its watcher handle by now
        watcher.shutdown().await;

        match gateway_result {
            Ok(Ok(())) => {
                info!("Bot stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(AppError::ExternalService(e.to_string())),
            Err(e) => Err(AppError::Internal(e.into())),
        }
    }
}
