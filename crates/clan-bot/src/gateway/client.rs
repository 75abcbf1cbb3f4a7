//! Gateway connection loop
//!
//! Connects, identifies (or resumes), keeps the heartbeat going and routes
//! dispatches until shutdown. Dropped connections are retried with backoff;
//! only close codes that point at configuration problems stop the loop.

use std::sync::Arc;
use std::time::Duration;

use clan_core::Snowflake;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, instrument, trace, warn};

use super::backoff::{jittered, Backoff};
use super::resume::ResumeState;
use super::router::{EventRouter, Routed};
use super::ProfileCache;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{intents, GatewayMessage, IdentifyPayload, OpCode};
use crate::watcher::WatcherHandle;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Wait before identifying again after a non-resumable Invalid Session
const INVALID_SESSION_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub token: String,
    pub intents: u64,
}

impl From<&clan_common::PlatformConfig> for GatewayConfig {
    fn from(config: &clan_common::PlatformConfig) -> Self {
        Self {
            url: config.gateway_url.clone(),
            token: config.bot_token.clone(),
            intents: intents::GUILDS | intents::GUILD_MEMBERS,
        }
    }
}

/// Why a connection ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disconnect {
    /// Gateway asked for a reconnect (op 7)
    Reconnect,
    /// Session invalidated (op 9)
    InvalidSession { resumable: bool },
}

pub struct GatewayClient {
    config: GatewayConfig,
    router: EventRouter,
    watcher: WatcherHandle,
    resume: ResumeState,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig, cache: Arc<ProfileCache>, bot_id: Snowflake, watcher: WatcherHandle) -> Self {
        Self {
            config,
            router: EventRouter::new(cache, bot_id),
            watcher,
            resume: ResumeState::default(),
        }
    }

    /// Run until `shutdown` flips to `true` or a fatal close code arrives
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> GatewayResult<()> {
        let mut backoff = Backoff::default();

        while !*shutdown.borrow() {
            let url = self.resume.connect_url(&self.config.url);

            let result = tokio::select! {
                result = self.connect_once(&url, &mut backoff) => result,
                _ = shutdown.changed() => break,
            };

            let delay = match result {
                Ok(Disconnect::Reconnect) => {
                    info!("Gateway requested reconnect");
                    Duration::ZERO
                }
                Ok(Disconnect::InvalidSession { resumable }) => {
                    warn!(resumable, "Gateway session invalidated");
                    if resumable {
                        Duration::ZERO
                    } else {
                        self.resume.clear();
                        INVALID_SESSION_DELAY + jittered(Duration::from_secs(2))
                    }
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Gateway connection cannot be recovered");
                    return Err(e);
                }
                Err(e) => {
                    if e.close_code().is_some_and(|code| code.invalidates_session()) {
                        self.resume.clear();
                    }
                    let delay = backoff.next_delay();
                    warn!(error = %e, retry_in_ms = delay.as_millis() as u64, "Gateway connection dropped");
                    delay
                }
            };

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("Gateway client stopped");
        Ok(())
    }

    #[instrument(skip_all, fields(resuming = self.resume.can_resume()))]
    async fn connect_once(&mut self, url: &str, backoff: &mut Backoff) -> GatewayResult<Disconnect> {
        let (mut socket, _) = connect_async(url).await?;
        debug!("WebSocket connected");

        let hello = read_message(&mut socket).await?;
        let heartbeat_interval = hello
            .as_hello()
            .map(|hello| Duration::from_millis(hello.heartbeat_interval))
            .ok_or_else(|| GatewayError::Protocol(format!("expected Hello, got {hello}")))?;

        let handshake = match self.resume.resume_payload(&self.config.token) {
            Some(payload) => GatewayMessage::resume(&payload)?,
            None => GatewayMessage::identify(&IdentifyPayload::new(&self.config.token, self.config.intents))?,
        };
        send(&mut socket, &handshake).await?;
        backoff.reset();

        let mut heartbeat = interval_at(Instant::now() + jittered(heartbeat_interval), heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut acked = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    // No ack since the last beat: the connection is a zombie
                    if !acked {
                        return Err(GatewayError::HeartbeatTimeout);
                    }
                    send(&mut socket, &GatewayMessage::heartbeat(self.resume.sequence())).await?;
                    acked = false;
                }
                frame = socket.next() => {
                    let message = match frame.ok_or(GatewayError::ConnectionLost)?? {
                        Message::Text(text) => GatewayMessage::from_json(&text)?,
                        Message::Close(frame) => {
                            return Err(GatewayError::Closed { code: frame.map(|f| u16::from(f.code)) });
                        }
                        _ => continue,
                    };

                    match message.op {
                        OpCode::Dispatch => self.dispatch(message).await?,
                        OpCode::Heartbeat => {
                            send(&mut socket, &GatewayMessage::heartbeat(self.resume.sequence())).await?;
                        }
                        OpCode::HeartbeatAck => acked = true,
                        OpCode::Reconnect => return Ok(Disconnect::Reconnect),
                        OpCode::InvalidSession => {
                            let resumable = message.as_invalid_session().unwrap_or(false);
                            return Ok(Disconnect::InvalidSession { resumable });
                        }
                        op => trace!(op = %op, "Ignoring gateway message"),
                    }
                }
            }
        }
    }

    async fn dispatch(&mut self, message: GatewayMessage) -> GatewayResult<()> {
        if let Some(seq) = message.s {
            self.resume.record_sequence(seq);
        }
        let (Some(event_name), Some(data)) = (message.t, message.d) else {
            return Ok(());
        };

        match self.router.route(&event_name, data) {
            Ok(Routed::Ready(ready)) => {
                info!(session_id = %ready.session_id, user = %ready.user.username, "Gateway session ready");
                self.resume.start_session(ready.session_id, ready.resume_gateway_url);
            }
            Ok(Routed::Profile(change)) => {
                self.watcher.submit(change)?;
            }
            Ok(Routed::Ignored) => {}
            // One bad payload is not worth the connection
            Err(e) => warn!(event = %event_name, error = %e, "Skipping malformed dispatch"),
        }
        Ok(())
    }
}

async fn send(socket: &mut Socket, message: &GatewayMessage) -> GatewayResult<()> {
    trace!(message = %message, "Sending");
    socket.send(Message::Text(message.to_json()?)).await?;
    Ok(())
}

async fn read_message(socket: &mut Socket) -> GatewayResult<GatewayMessage> {
    loop {
        match socket.next().await.ok_or(GatewayError::ConnectionLost)?? {
            Message::Text(text) => return Ok(GatewayMessage::from_json(&text)?),
            Message::Close(frame) => {
                return Err(GatewayError::Closed { code: frame.map(|f| u16::from(f.code)) });
            }
            _ => {}
        }
    }
}
