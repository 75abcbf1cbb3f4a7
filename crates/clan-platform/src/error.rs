//! Platform client errors

use clan_core::{DomainError, Snowflake};
use thiserror::Error;

/// Errors from talking to the platform REST API
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Missing access for member {0}")]
    Forbidden(Snowflake),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<PlatformError> for DomainError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::Forbidden(member_id) => DomainError::InsufficientPrivilege(member_id),
            PlatformError::Build(msg) => DomainError::InternalError(msg),
            other => DomainError::SourceUnavailable(other.to_string()),
        }
    }
}
