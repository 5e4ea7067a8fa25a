use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::discord::types::{CreateMessage, Embed, COLOR_BRAND, COLOR_OFFLINE, COLOR_ONLINE};
use crate::discord::{DiscordError, DiscordHttp};
use crate::i18n::{Lang, Text};
use crate::models::{AvailabilityState, RankedPool, ServerStatus, StatusTransition};
use crate::sources::PoolSource;
use super::monitor::StatusSink;
use super::ranker;
use super::scheduler::ReminderSink;

/// Pools listed in a reminder.
const REMINDER_POOLS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("reminder channel or guild is not configured")]
    NotConfigured,
    #[error("destination unresolvable: {0}")]
    DestinationUnresolvable(String),
    #[error(transparent)]
    Discord(#[from] DiscordError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub guild_id: String,
    pub channel_id: String,
}

/// Posts status alerts and reminders to the configured channel.
pub struct Notifier {
    http: Arc<DiscordHttp>,
    destination: Option<Destination>,
    website: String,
    lang: Lang,
    pools: Arc<dyn PoolSource>,
}

impl Notifier {
    pub fn new(
        http: Arc<DiscordHttp>,
        destination: Option<Destination>,
        website: &str,
        lang: Lang,
        pools: Arc<dyn PoolSource>,
    ) -> Self {
        Self {
            http,
            destination,
            website: website.to_string(),
            lang,
            pools,
        }
    }

    /// The channel must exist and belong to the configured guild.
    async fn resolve_channel(&self) -> Result<&str, NotifyError> {
        let dest = self.destination.as_ref().ok_or(NotifyError::NotConfigured)?;

        let channel = self.http.get_channel(&dest.channel_id).await.map_err(|e| {
            NotifyError::DestinationUnresolvable(format!("channel {}: {}", dest.channel_id, e))
        })?;

        if channel.guild_id.as_deref() != Some(dest.guild_id.as_str()) {
            return Err(NotifyError::DestinationUnresolvable(format!(
                "channel {} is not in guild {}",
                channel.id, dest.guild_id
            )));
        }
        Ok(&dest.channel_id)
    }

    async fn deliver(&self, message: CreateMessage) -> Result<(), NotifyError> {
        let channel_id = self.resolve_channel().await?;
        self.http.create_message(channel_id, &message).await?;
        Ok(())
    }

    pub async fn notify_status(&self, status: ServerStatus, state: AvailabilityState) {
        let message = CreateMessage {
            content: (status == ServerStatus::Offline).then(|| "@everyone".to_string()),
            embeds: vec![status_embed(status, self.lang, &self.website, state.last_checked)],
            ..Default::default()
        };

        match self.deliver(message).await {
            Ok(()) => tracing::info!("📢 Status notification sent: server {}", status.as_str()),
            Err(NotifyError::NotConfigured) => {}
            Err(e) => tracing::error!("❌ Failed to send status notification: {}", e),
        }
    }

    pub async fn send_reminder(&self, title: &str) {
        if self.destination.is_none() {
            tracing::warn!("REMINDER_CHANNEL_ID or REMINDER_GUILD_ID not configured, skipping reminder");
            return;
        }

        let pools = ranker::best_pools(self.pools.as_ref()).await;
        let message = CreateMessage {
            embeds: vec![reminder_embed(title, self.lang, &pools, Utc::now())],
            ..Default::default()
        };

        match self.deliver(message).await {
            Ok(()) => tracing::info!("⏰ Reminder sent: {}", title),
            Err(e) => tracing::error!("❌ Failed to send reminder: {}", e),
        }
    }
}

#[async_trait]
impl StatusSink for Notifier {
    async fn on_transition(&self, transition: StatusTransition, state: AvailabilityState) {
        tracing::debug!(
            "Notifying {} -> {} detected at {}",
            transition.from.as_str(),
            transition.to.as_str(),
            transition.at
        );
        self.notify_status(transition.to, state).await;
    }
}

#[async_trait]
impl ReminderSink for Notifier {
    async fn remind(&self, title: Text) {
        self.send_reminder(self.lang.text(title)).await;
    }
}

/// `https://www.hoops.finance/` -> `hoops.finance`
pub fn display_host(url: &str) -> &str {
    let host = url.split("://").nth(1).unwrap_or(url);
    let host = host.split('/').next().unwrap_or(host);
    host.strip_prefix("www.").unwrap_or(host)
}

pub fn status_label(status: ServerStatus) -> &'static str {
    match status {
        ServerStatus::Online => "✅ Online",
        ServerStatus::Offline => "❌ Offline",
    }
}

pub fn status_embed(status: ServerStatus, lang: Lang, website: &str, last_checked: DateTime<Utc>) -> Embed {
    let (title, text, color) = match status {
        ServerStatus::Online => ("🟢 Hoops Finance Online", Text::ServerOnline, COLOR_ONLINE),
        ServerStatus::Offline => ("🔴 Hoops Finance Offline", Text::ServerOffline, COLOR_OFFLINE),
    };

    Embed::new()
        .title(title)
        .description(lang.text(text))
        .color(color)
        .timestamp(Utc::now())
        .field("🌐 Website", format!("[{}]({})", display_host(website), website), true)
        .field(lang.text(Text::Status), status_label(status), true)
        .field(lang.text(Text::LastCheck), last_checked.format("%Y-%m-%d %H:%M:%S UTC").to_string(), true)
        .footer("🤖 Hoops Helper Bot - Automatic monitoring")
}

pub fn reminder_embed(title: &str, lang: Lang, pools: &[RankedPool], at: DateTime<Utc>) -> Embed {
    let top: Vec<String> = pools
        .iter()
        .take(REMINDER_POOLS)
        .enumerate()
        .map(|(i, p)| format!("**{}.** {} - {} APR · TVL {}", i + 1, p.name, p.apr, p.tvl))
        .collect();
    let top = if top.is_empty() { lang.text(Text::NoData).to_string() } else { top.join("\n") };

    Embed::new()
        .title(title)
        .description(lang.text(Text::ReminderTitle))
        .color(COLOR_BRAND)
        .timestamp(at)
        .field(lang.text(Text::BestPools), top, false)
        .field(lang.text(Text::WhyReview), lang.text(Text::WhyReviewText), false)
        .field(lang.text(Text::UsefulCommands), lang.text(Text::CommandsText), false)
        .field(lang.text(Text::NextReminder), lang.text(Text::In12Hours), true)
        .footer("🤖 Hoops Helper Bot - Automatic reminders")
}
