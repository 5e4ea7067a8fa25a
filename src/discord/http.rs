use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use super::types::{Application, Channel, CreateMessage, Embed, InteractionResponse, MessageReference};
use super::DiscordError;

pub const API_BASE: &str = "https://discord.com/api/v10";

/// Bot-authenticated client for the Discord REST API.
pub struct DiscordHttp {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u64>,
    #[serde(default)]
    message: String,
}

impl DiscordHttp {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, DiscordError> {
        Self::with_base_url(token, API_BASE, timeout)
    }

    pub fn with_base_url(token: &str, base_url: &str, timeout: Duration) -> Result<Self, DiscordError> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(concat!("DiscordBot (hoops-helper, ", env!("CARGO_PKG_VERSION"), ")"))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn check(resp: Response) -> Result<Response, DiscordError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body: ApiErrorBody = resp.json().await.unwrap_or_default();
        Err(DiscordError::Api {
            status,
            code: body.code,
            message: body.message,
        })
    }

    pub async fn get_channel(&self, channel_id: &str) -> Result<Channel, DiscordError> {
        let resp = self.client.get(self.url(&format!("/channels/{}", channel_id)))
            .header("Authorization", self.auth())
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    pub async fn create_message(&self, channel_id: &str, message: &CreateMessage) -> Result<(), DiscordError> {
        let resp = self.client.post(self.url(&format!("/channels/{}/messages", channel_id)))
            .header("Authorization", self.auth())
            .json(message)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn reply(&self, channel_id: &str, message_id: &str, content: &str) -> Result<(), DiscordError> {
        let message = CreateMessage {
            content: Some(content.to_string()),
            message_reference: Some(MessageReference { message_id: message_id.to_string() }),
            ..Default::default()
        };
        self.create_message(channel_id, &message).await
    }

    /// Initial response to an interaction. Interaction endpoints are
    /// authenticated by the token in the path.
    pub async fn interaction_callback(
        &self,
        interaction_id: &str,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<(), DiscordError> {
        let resp = self.client
            .post(self.url(&format!("/interactions/{}/{}/callback", interaction_id, interaction_token)))
            .json(response)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Replaces the body of a deferred interaction response.
    pub async fn edit_original(
        &self,
        application_id: &str,
        interaction_token: &str,
        embeds: Vec<Embed>,
    ) -> Result<(), DiscordError> {
        let resp = self.client
            .patch(self.url(&format!("/webhooks/{}/{}/messages/@original", application_id, interaction_token)))
            .json(&serde_json::json!({ "embeds": embeds }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn current_application(&self) -> Result<Application, DiscordError> {
        let resp = self.client.get(self.url("/applications/@me"))
            .header("Authorization", self.auth())
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Overwrites the full set of global application commands.
    pub async fn set_global_commands(
        &self,
        application_id: &str,
        commands: &serde_json::Value,
    ) -> Result<(), DiscordError> {
        let resp = self.client.put(self.url(&format!("/applications/{}/commands", application_id)))
            .header("Authorization", self.auth())
            .json(commands)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}
