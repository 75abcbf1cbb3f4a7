//! Clan API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p clan-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use clan_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration first: the log format depends on APP_ENV
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

    info!(
        env = ?config.app.env,
        port = config.api.port,
        groups = config.sync.groups.len(),
        "Starting Clan API Server..."
    );

    if let Err(e) = clan_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
