//! Bot error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::CloseCode;

/// Errors ending one gateway connection
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Invalid gateway payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Gateway closed the connection (code {code:?})")]
    Closed { code: Option<u16> },

    #[error("Heartbeat was not acknowledged")]
    HeartbeatTimeout,

    #[error("Connection lost")]
    ConnectionLost,

    #[error("Watcher queue closed")]
    WatcherClosed,
}

impl GatewayError {
    /// Close code sent by the gateway, when it is one it defines
    #[must_use]
    pub fn close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Closed { code: Some(code) } => CloseCode::try_from(*code).ok(),
            _ => None,
        }
    }

    /// Retrying cannot help; the bot should stop
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::WatcherClosed) || self.close_code().is_some_and(|code| !code.should_reconnect())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
