use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use super::types::{GatewayPayload, Interaction, Message, Ready};
use super::DiscordError;

pub const GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

const INTENT_GUILDS: u64 = 1 << 0;
const INTENT_GUILD_MESSAGES: u64 = 1 << 9;
const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;
pub const INTENTS: u64 = INTENT_GUILDS | INTENT_GUILD_MESSAGES | INTENT_MESSAGE_CONTENT;

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

/// Close codes after which reconnecting cannot succeed.
const FATAL_CLOSE_CODES: [u16; 6] = [4004, 4010, 4011, 4012, 4013, 4014];

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    async fn on_ready(&self, ready: Ready);
    async fn on_interaction(&self, interaction: Interaction);
    async fn on_message(&self, message: Message);
}

#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Reconnect,
}

/// Gateway session runner. Each session identifies from scratch.
pub struct Gateway {
    token: String,
    url: String,
    handler: Arc<dyn EventHandler>,
    reconnect_delay: Duration,
}

impl Gateway {
    pub fn new(token: &str, handler: Arc<dyn EventHandler>) -> Self {
        Self::with_url(token, GATEWAY_URL, handler)
    }

    pub fn with_url(token: &str, url: &str, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            token: token.to_string(),
            url: url.to_string(),
            handler,
            reconnect_delay: RECONNECT_DELAY,
        }
    }

    /// Runs sessions until a fatal close code is received.
    pub async fn run(&self) -> Result<(), DiscordError> {
        loop {
            match self.run_session().await {
                Ok(SessionEnd::Reconnect) => {
                    tracing::info!("🔌 Gateway session ended, reconnecting");
                }
                Err(e @ DiscordError::FatalClose(..)) => return Err(e),
                Err(e) => {
                    tracing::warn!("🔌 Gateway session failed: {}", e);
                }
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn run_session(&self) -> Result<SessionEnd, DiscordError> {
        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| DiscordError::Gateway(e.to_string()))?;
        let (mut write, mut read) = ws_stream.split();

        let heartbeat_ms = loop {
            match read.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    let payload: GatewayPayload = serde_json::from_str(&text)?;
                    if payload.op == OP_HELLO {
                        break payload.d
                            .as_ref()
                            .and_then(|d| d["heartbeat_interval"].as_u64())
                            .ok_or_else(|| DiscordError::Gateway("hello without heartbeat_interval".to_string()))?;
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => return close_outcome(frame),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(DiscordError::Gateway(e.to_string())),
                None => return Ok(SessionEnd::Reconnect),
            }
        };

        let identify = json!({
            "op": OP_IDENTIFY,
            "d": {
                "token": self.token,
                "intents": INTENTS,
                "properties": {
                    "os": std::env::consts::OS,
                    "browser": "hoops-helper",
                    "device": "hoops-helper"
                }
            }
        });
        send_json(&mut write, &identify).await?;
        tracing::debug!("🔌 Identified, heartbeat every {}ms", heartbeat_ms);

        let mut heartbeat = interval(Duration::from_millis(heartbeat_ms.max(1)));
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        heartbeat.tick().await;

        let mut sequence: Option<u64> = None;
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        tracing::warn!("💔 Heartbeat not acknowledged, reconnecting");
                        return Ok(SessionEnd::Reconnect);
                    }
                    send_json(&mut write, &json!({"op": OP_HEARTBEAT, "d": sequence})).await?;
                    awaiting_ack = true;
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            let payload: GatewayPayload = match serde_json::from_str(&text) {
                                Ok(p) => p,
                                Err(e) => {
                                    tracing::warn!("Unreadable gateway payload: {}", e);
                                    continue;
                                }
                            };
                            if let Some(s) = payload.s {
                                sequence = Some(s);
                            }
                            match payload.op {
                                OP_DISPATCH => self.dispatch(payload.t.as_deref(), payload.d),
                                OP_HEARTBEAT => {
                                    send_json(&mut write, &json!({"op": OP_HEARTBEAT, "d": sequence})).await?;
                                }
                                OP_HEARTBEAT_ACK => awaiting_ack = false,
                                OP_RECONNECT => return Ok(SessionEnd::Reconnect),
                                OP_INVALID_SESSION => {
                                    tracing::warn!("Gateway invalidated the session");
                                    return Ok(SessionEnd::Reconnect);
                                }
                                _ => {}
                            }
                        }
                        Some(Ok(WsMessage::Close(frame))) => return close_outcome(frame),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(DiscordError::Gateway(e.to_string())),
                        None => return Ok(SessionEnd::Reconnect),
                    }
                }
            }
        }
    }

    fn dispatch(&self, event: Option<&str>, data: Option<serde_json::Value>) {
        let Some(data) = data else { return };
        let handler = self.handler.clone();

        match event {
            Some("READY") => match serde_json::from_value::<Ready>(data) {
                Ok(ready) => {
                    tokio::spawn(async move { handler.on_ready(ready).await });
                }
                Err(e) => tracing::warn!("Bad READY payload: {}", e),
            },
            Some("INTERACTION_CREATE") => match serde_json::from_value::<Interaction>(data) {
                Ok(interaction) => {
                    tokio::spawn(async move { handler.on_interaction(interaction).await });
                }
                Err(e) => tracing::warn!("Bad INTERACTION_CREATE payload: {}", e),
            },
            Some("MESSAGE_CREATE") => {
                if let Ok(message) = serde_json::from_value::<Message>(data) {
                    tokio::spawn(async move { handler.on_message(message).await });
                }
            }
            _ => {}
        }
    }
}

async fn send_json<S>(write: &mut S, value: &serde_json::Value) -> Result<(), DiscordError>
where
    S: futures::Sink<WsMessage> + Unpin,
    S::Error: std::fmt::Display,
{
    write
        .send(WsMessage::Text(value.to_string()))
        .await
        .map_err(|e| DiscordError::Gateway(e.to_string()))
}

fn close_outcome(
    frame: Option<tokio_tungstenite::tungstenite::protocol::CloseFrame<'static>>,
) -> Result<SessionEnd, DiscordError> {
    if let Some(frame) = frame {
        let code = u16::from(frame.code);
        if FATAL_CLOSE_CODES.contains(&code) {
            return Err(DiscordError::FatalClose(code, frame.reason.to_string()));
        }
        tracing::info!("🔌 Gateway closed with {}: {}", code, frame.reason);
    }
    Ok(SessionEnd::Reconnect)
}
