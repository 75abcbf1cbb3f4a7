//! Clan bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p clan-bot
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use clan_bot::PlatformSession;
use clan_common::{try_init_tracing, AppConfig, AppError, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Bot failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(
        env = ?config.app.env,
        groups = config.sync.groups.len(),
        interval_secs = config.sync.interval_secs,
        watcher_workers = config.watcher.workers,
        "Starting clan bot..."
    );

    PlatformSession::connect(config).await?.run_until_shutdown().await
}
