//! Global `tracing` subscriber
//!
//! `RUST_LOG` overrides the level picked for the environment.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::Environment;

/// Dependencies that are chatty at debug level
const QUIET_TARGETS: &[&str] = &["sqlx=warn", "tungstenite=info", "tokio_tungstenite=info", "hyper=info"];

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level when `RUST_LOG` is unset
    pub level: Level,
    pub json: bool,
    /// Emit span close events with timings
    pub span_events: bool,
    pub file_line: bool,
}

impl TracingConfig {
    /// Readable debug output in development, JSON elsewhere
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: Level::DEBUG,
                json: false,
                span_events: true,
                file_line: true,
            },
            Environment::Staging => Self {
                level: Level::DEBUG,
                json: true,
                span_events: false,
                file_line: false,
            },
            Environment::Production => Self {
                level: Level::INFO,
                json: true,
                span_events: false,
                file_line: false,
            },
        }
    }

    fn default_directives(&self) -> String {
        std::iter::once(self.level.as_str().to_lowercase())
            .chain(QUIET_TARGETS.iter().map(|d| (*d).to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.span_events { FmtSpan::CLOSE } else { FmtSpan::NONE };
        let layer = fmt::layer()
            .with_file(self.file_line)
            .with_line_number(self.file_line)
            .with_span_events(spans);

        if self.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}

/// Install the global subscriber; fails if one is already set
pub fn try_init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
