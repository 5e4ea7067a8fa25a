pub mod gateway;
pub mod http;
pub mod types;

pub use gateway::{EventHandler, Gateway};
pub use http::DiscordHttp;

#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("discord api returned {status} (code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<u64>,
        message: String,
    },
    #[error("gateway error: {0}")]
    Gateway(String),
    #[error("gateway closed the session with fatal code {0}: {1}")]
    FatalClose(u16, String),
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiscordError {
    /// Operator hint for the Discord error codes seen when registering commands.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DiscordError::Api { code: Some(50001), .. } => Some("Check that the bot has the applications.commands scope"),
            DiscordError::Api { code: Some(50013), .. } => Some("The bot lacks permission to register commands"),
            DiscordError::Api { code: Some(40001), .. } | DiscordError::Api { status: 401, .. } => Some("Token is invalid or expired"),
            DiscordError::FatalClose(4014, _) => Some("Enable the Message Content intent in the developer portal"),
            _ => None,
        }
    }
}
