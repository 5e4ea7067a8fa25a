use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::config::ScheduleConfig;
use crate::discord::types::{
    CommandData, Embed, Interaction, InteractionResponse, Message, Ready, COLOR_BRAND,
    COLOR_OFFLINE, COLOR_ONLINE, INTERACTION_APPLICATION_COMMAND,
};
use crate::discord::{DiscordError, DiscordHttp, EventHandler};
use crate::i18n::{Lang, Text};
use crate::models::{RankedPool, ServerStatus};
use crate::services::notifier::{display_host, status_label};
use crate::services::{knowledge, ranker, AvailabilityMonitor};
use crate::sources::PoolSource;

const QUESTION_PREVIEW_CHARS: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),
    #[error(transparent)]
    Discord(#[from] DiscordError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ask { question: String },
    BestPools,
    StatusServer,
    Language { lang: Lang },
    Help,
}

impl Command {
    /// `Ok(None)` for commands this bot does not know.
    pub fn parse(data: &CommandData) -> Result<Option<Self>, CommandError> {
        let command = match data.name.as_str() {
            "ask" => Command::Ask {
                question: data
                    .string_option("question")
                    .ok_or(CommandError::MissingOption("question"))?
                    .to_string(),
            },
            "best-pools" => Command::BestPools,
            "status-server" => Command::StatusServer,
            "language" => Command::Language {
                lang: Lang::from_code(data.string_option("lang").ok_or(CommandError::MissingOption("lang"))?),
            },
            "help" => Command::Help,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Commands doing network I/O acknowledge first and edit the reply later.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Command::Ask { .. } | Command::BestPools | Command::StatusServer)
    }
}

/// Slash command definitions in the shape Discord's registration API expects.
pub fn definitions() -> serde_json::Value {
    const STRING: u8 = 3;

    let choices: Vec<serde_json::Value> = Lang::ALL
        .iter()
        .map(|l| json!({ "name": format!("{} {}", l.flag(), l.name()), "value": l.code() }))
        .collect();

    json!([
        {
            "name": "ask",
            "description": "Ask the AI about Hoops Finance",
            "options": [{
                "type": STRING,
                "name": "question",
                "description": "Your question about Hoops Finance",
                "required": true
            }]
        },
        {
            "name": "best-pools",
            "description": "View the best pools by APY with real-time data"
        },
        {
            "name": "status-server",
            "description": "Check Hoops Finance server status"
        },
        {
            "name": "language",
            "description": "Change bot language",
            "options": [{
                "type": STRING,
                "name": "lang",
                "description": "Select language",
                "required": true,
                "choices": choices
            }]
        },
        {
            "name": "help",
            "description": "Help and available commands"
        }
    ])
}

/// Clears stale global commands, then registers the current set.
pub async fn register_commands(http: &DiscordHttp, application_id: &str) -> Result<(), DiscordError> {
    tracing::info!("🧹 Clearing old commands...");
    http.set_global_commands(application_id, &json!([])).await?;

    let commands = definitions();
    tracing::info!("🔄 Registering commands...");
    http.set_global_commands(application_id, &commands).await?;

    if let Some(list) = commands.as_array() {
        for cmd in list {
            tracing::info!("   - /{} - {}", cmd["name"].as_str().unwrap_or(""), cmd["description"].as_str().unwrap_or(""));
        }
        tracing::info!("✅ {} commands registered", list.len());
    }
    Ok(())
}

/// Routes gateway events to command handlers and replies through REST.
pub struct CommandRouter {
    http: Arc<DiscordHttp>,
    pools: Arc<dyn PoolSource>,
    monitor: Arc<AvailabilityMonitor>,
    website: String,
    schedule: ScheduleConfig,
}

impl CommandRouter {
    pub fn new(
        http: Arc<DiscordHttp>,
        pools: Arc<dyn PoolSource>,
        monitor: Arc<AvailabilityMonitor>,
        website: &str,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            http,
            pools,
            monitor,
            website: website.to_string(),
            schedule,
        }
    }

    pub async fn execute(&self, command: &Command) -> Embed {
        let now = Utc::now();
        match command {
            Command::Ask { question } => ask_embed(question, knowledge::answer(question), now),
            Command::BestPools => {
                let pools = ranker::best_pools(self.pools.as_ref()).await;
                best_pools_embed(&pools, now)
            }
            Command::StatusServer => {
                let online = self.monitor.check().await;
                server_status_embed(ServerStatus::from_online(online), &self.website, now)
            }
            Command::Language { lang } => language_embed(*lang, now),
            Command::Help => help_embed(&self.schedule),
        }
    }

    pub async fn handle_interaction(&self, interaction: Interaction) {
        if interaction.kind != INTERACTION_APPLICATION_COMMAND {
            return;
        }
        let Some(data) = interaction.data.as_ref() else { return };

        let mut deferred = false;
        let Err(e) = self.respond(&interaction, data, &mut deferred).await else { return };

        tracing::error!("❌ Error handling /{}: {}", data.name, e);
        let embed = error_embed();
        let sent = if deferred {
            self.http.edit_original(&interaction.application_id, &interaction.token, vec![embed]).await
        } else {
            self.http
                .interaction_callback(&interaction.id, &interaction.token, &InteractionResponse::ephemeral(embed))
                .await
        };
        if let Err(e) = sent {
            tracing::error!("❌ Could not deliver error reply for /{}: {}", data.name, e);
        }
    }

    async fn respond(
        &self,
        interaction: &Interaction,
        data: &CommandData,
        deferred: &mut bool,
    ) -> Result<(), CommandError> {
        let Some(command) = Command::parse(data)? else {
            tracing::debug!("Ignoring unknown command /{}", data.name);
            return Ok(());
        };
        tracing::info!("⚡ /{}", data.name);

        if command.is_deferred() {
            self.http
                .interaction_callback(&interaction.id, &interaction.token, &InteractionResponse::deferred())
                .await?;
            *deferred = true;

            let embed = self.execute(&command).await;
            self.http
                .edit_original(&interaction.application_id, &interaction.token, vec![embed])
                .await?;
        } else {
            let embed = self.execute(&command).await;
            self.http
                .interaction_callback(&interaction.id, &interaction.token, &InteractionResponse::embed(embed))
                .await?;
        }
        Ok(())
    }

    /// Legacy text command kept for users who never moved to slash commands.
    pub async fn handle_message(&self, message: Message) {
        if message.author.bot || message.content.trim() != "!ping" {
            return;
        }
        let reply = "🏓 Pong! The bot is working correctly. Use `/help` to see the available slash commands.";
        if let Err(e) = self.http.reply(&message.channel_id, &message.id, reply).await {
            tracing::error!("❌ Failed to answer !ping: {}", e);
        }
    }
}

#[async_trait]
impl EventHandler for CommandRouter {
    async fn on_ready(&self, ready: Ready) {
        tracing::info!("✅ Bot connected as {} ({}), session {}", ready.user.username, ready.user.id, ready.session_id);
    }

    async fn on_interaction(&self, interaction: Interaction) {
        self.handle_interaction(interaction).await;
    }

    async fn on_message(&self, message: Message) {
        self.handle_message(message).await;
    }
}

fn preview(question: &str) -> String {
    if question.chars().count() > QUESTION_PREVIEW_CHARS {
        let cut: String = question.chars().take(QUESTION_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        question.to_string()
    }
}

fn readable_time(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %I:%M %p UTC").to_string()
}

pub fn ask_embed(question: &str, answer: Option<&str>, now: DateTime<Utc>) -> Embed {
    Embed::new()
        .title("🤖 AI Assistant - Hoops Finance")
        .description(answer.unwrap_or(Lang::En.text(Text::Default)))
        .color(COLOR_BRAND)
        .timestamp(now)
        .field("💡 Question", preview(question), false)
        .footer("🤖 AI integrated")
}

pub fn best_pools_embed(pools: &[RankedPool], now: DateTime<Utc>) -> Embed {
    let mut embed = Embed::new()
        .title("🏆 Best Pools by APY - Hoops Finance")
        .description("Top 5 pools with best performance | Real-time data")
        .color(COLOR_BRAND)
        .timestamp(now);

    if pools.is_empty() {
        embed = embed.field(
            "⚠️ No Data Available",
            "No active pools found with APY > 0. Check back later!",
            false,
        );
    }
    for (index, pool) in pools.iter().enumerate() {
        let medal = match index {
            0 => "🥇".to_string(),
            1 => "🥈".to_string(),
            2 => "🥉".to_string(),
            n => format!("{}.", n + 1),
        };
        embed = embed.field(
            format!("{} {}", medal, pool.name),
            format!(
                "📈 APR: {}\n📊 Trending: {}\n💰 TVL: {}\n📊 Volume: {}\n🏷️ Protocol: {}",
                pool.apr, pool.trending, pool.tvl, pool.volume, pool.protocol
            ),
            false,
        );
    }

    embed
        .field("🔄 Data Updated", format!("from Hoops Finance API • {}", readable_time(now)), false)
        .footer("🏀 Hoops Finance - Real-time data")
}

pub fn server_status_embed(status: ServerStatus, website: &str, now: DateTime<Utc>) -> Embed {
    let (color, details) = match status {
        ServerStatus::Online => (
            COLOR_ONLINE,
            "The server is running correctly and responding to requests.",
        ),
        ServerStatus::Offline => (
            COLOR_OFFLINE,
            "The server is not responding. It may be under maintenance or experiencing problems.",
        ),
    };

    Embed::new()
        .title("🔍 Hoops Finance Server Status")
        .color(color)
        .timestamp(now)
        .field("🌐 Website", format!("[{}]({})", display_host(website), website), true)
        .field("📊 Status", status_label(status), true)
        .field("⏰ Checked", readable_time(now), true)
        .field("📈 Details", details, false)
        .footer("🤖 Hoops Helper Bot - Manual check")
}

pub fn language_embed(lang: Lang, now: DateTime<Utc>) -> Embed {
    Embed::new()
        .title("🌍 Bot Language")
        .description(format!("Language changed to: {} {}", lang.flag(), lang.name()))
        .color(COLOR_ONLINE)
        .timestamp(now)
        .field(
            "📋 Available Commands",
            "`/ask` - Ask the AI\n`/best-pools` - Best pools by APY\n`/status-server` - Check server\n`/language` - Change language\n`/help` - Help",
            false,
        )
        .field("ℹ️ Note", "Language affects bot responses. Commands remain in English.", false)
        .footer("🤖 Hoops Helper Bot - Multi-language")
}

/// `22` -> `10:00 PM`
fn clock_hour(hour: u32) -> String {
    let hour = hour % 24;
    let (display, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{}:00 {}", display, suffix)
}

pub fn help_embed(schedule: &ScheduleConfig) -> Embed {
    Embed::new()
        .title("🏀 Hoops Helper Bot - Commands")
        .description("AI-powered bot with real-time Hoops Finance data")
        .color(COLOR_BRAND)
        .field("🤖 AI Assistant", "`/ask <question>` - Ask about Hoops Finance", false)
        .field(
            "🏊 Pools & Data",
            "`/best-pools` - Best pools by APY (real-time)\n`/status-server` - Check Hoops Finance server",
            false,
        )
        .field("🌍 Settings", "`/language` - Change bot language (EN/ES/PT)", false)
        .field(
            "⏰ Auto Features",
            format!(
                "• Server check and pool reminder at {} and {} UTC\n• Real-time monitoring every {} minutes",
                clock_hour(schedule.morning_hour),
                clock_hour(schedule.evening_hour),
                schedule.status_interval_minutes.clamp(1, 60)
            ),
            false,
        )
        .footer("🤖 Powered by Hoops Finance API")
}

pub fn error_embed() -> Embed {
    Embed::new()
        .title("❌ Error")
        .description("There was an error processing your command. Please try again.")
        .color(COLOR_OFFLINE)
        .timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PoolRecord;
    use crate::sources::test_server::{self, Silent, StaticPools};
    use crate::sources::website::WebsiteProbe;
    use axum::{extract::{Path, State}, routing::{get, patch, post}, Json, Router};
    use parking_lot::Mutex;
    use std::time::Duration;

    type Calls = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

    /// Fake Discord recording callbacks, edits and channel messages, plus a
    /// website root that answers 200.
    async fn fake_discord() -> (String, Calls) {
        let calls: Calls = Arc::default();
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/interactions/:id/:token/callback", post(
                |State(calls): State<Calls>, Json(body): Json<serde_json::Value>| async move {
                    calls.lock().push(("callback".to_string(), body));
                },
            ))
            .route("/webhooks/:app/:token/messages/@original", patch(
                |State(calls): State<Calls>, Json(body): Json<serde_json::Value>| async move {
                    calls.lock().push(("edit".to_string(), body));
                    Json(json!({"id": "m"}))
                },
            ))
            .route("/channels/:id/messages", post(
                |State(calls): State<Calls>, Path(id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                    calls.lock().push((format!("message:{}", id), body));
                    Json(json!({"id": "m"}))
                },
            ))
            .with_state(calls.clone());
        (test_server::spawn(app).await, calls)
    }

    fn router(base: &str, records: Vec<PoolRecord>) -> CommandRouter {
        let http = Arc::new(DiscordHttp::with_base_url("t", base, Duration::from_secs(2)).unwrap());
        let probe = Arc::new(WebsiteProbe::new(base, Duration::from_secs(2)).unwrap());
        let monitor = Arc::new(AvailabilityMonitor::new(probe, Arc::new(Silent)));
        CommandRouter::new(
            http,
            Arc::new(StaticPools(records)),
            monitor,
            "https://www.hoops.finance",
            ScheduleConfig::default(),
        )
    }

    fn interaction(name: &str, options: serde_json::Value) -> Interaction {
        serde_json::from_value(json!({
            "id": "i1",
            "application_id": "app",
            "type": 2,
            "token": "tok",
            "data": {"name": name, "options": options}
        }))
        .unwrap()
    }

    fn pool(name: &str, apr: &str) -> PoolRecord {
        PoolRecord {
            market: Some(name.to_string()),
            apr: Some(apr.to_string()),
            total_value_locked: Some("1000".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_reads_options() {
        let data = interaction("language", json!([{"name": "lang", "value": "pt"}])).data.unwrap();
        assert_eq!(Command::parse(&data).unwrap(), Some(Command::Language { lang: Lang::Pt }));

        let data = interaction("ask", json!([])).data.unwrap();
        assert!(matches!(Command::parse(&data), Err(CommandError::MissingOption("question"))));

        let data = interaction("dance", json!([])).data.unwrap();
        assert_eq!(Command::parse(&data).unwrap(), None);
    }

    #[test]
    fn test_definitions_cover_every_command() {
        let defs = definitions();
        let names: Vec<&str> = defs.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["ask", "best-pools", "status-server", "language", "help"]);
        assert_eq!(defs[3]["options"][0]["choices"][1]["value"], "es");
    }

    #[test]
    fn test_long_questions_are_truncated() {
        let question = "é".repeat(150);
        let embed = ask_embed(&question, None, Utc::now());
        let shown = &embed.fields[0].value;
        assert_eq!(shown.chars().count(), QUESTION_PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
        assert_eq!(embed.description.as_deref(), Some(Lang::En.text(Text::Default)));
    }

    #[test]
    fn test_best_pools_embed_uses_medals_then_numbers() {
        let records: Vec<PoolRecord> = (1..=5).map(|i| pool(&format!("P{}", i), &i.to_string())).collect();
        let ranked = ranker::rank(&records);
        let embed = best_pools_embed(&ranked, Utc::now());

        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names[0], "🥇 P5");
        assert_eq!(names[1], "🥈 P4");
        assert_eq!(names[2], "🥉 P3");
        assert_eq!(names[3], "4. P2");
        assert_eq!(names[4], "5. P1");
        assert_eq!(names[5], "🔄 Data Updated");

        let empty = best_pools_embed(&[], Utc::now());
        assert_eq!(empty.fields[0].name, "⚠️ No Data Available");
    }

    #[test]
    fn test_help_lists_the_configured_schedule() {
        let schedule = ScheduleConfig {
            status_interval_minutes: 15,
            morning_hour: 0,
            evening_hour: 13,
        };
        let auto = &help_embed(&schedule).fields[3].value;
        assert_eq!(
            auto,
            "• Server check and pool reminder at 12:00 AM and 1:00 PM UTC\n• Real-time monitoring every 15 minutes"
        );

        let defaults = &help_embed(&ScheduleConfig::default()).fields[3].value;
        assert!(defaults.contains("9:00 AM and 10:00 PM UTC"));
        assert!(defaults.contains("every 5 minutes"));
    }

    #[tokio::test]
    async fn test_help_replies_immediately() {
        let (base, calls) = fake_discord().await;
        router(&base, vec![]).handle_interaction(interaction("help", json!([]))).await;

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "callback");
        assert_eq!(calls[0].1["type"], 4);
        assert_eq!(calls[0].1["data"]["embeds"][0]["title"], "🏀 Hoops Helper Bot - Commands");
    }

    #[tokio::test]
    async fn test_ask_defers_then_edits_answer() {
        let (base, calls) = fake_discord().await;
        let question = json!([{"name": "question", "value": "What is Stellar?"}]);
        router(&base, vec![]).handle_interaction(interaction("ask", question)).await;

        let calls = calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1["type"], 5);
        assert_eq!(calls[1].0, "edit");
        let description = calls[1].1["embeds"][0]["description"].as_str().unwrap();
        assert!(description.starts_with("Stellar is the blockchain"));
    }

    #[tokio::test]
    async fn test_best_pools_reply_lists_ranked_pools() {
        let (base, calls) = fake_discord().await;
        let records = vec![pool("LOW", "8.5"), pool("HIGH", "12.0"), pool("DEAD", "0")];
        router(&base, records).handle_interaction(interaction("best-pools", json!([]))).await;

        let calls = calls.lock();
        let fields = calls[1].1["embeds"][0]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0]["name"], "🥇 HIGH");
        assert_eq!(fields[1]["name"], "🥈 LOW");
    }

    #[tokio::test]
    async fn test_status_server_runs_a_fresh_check() {
        let (base, calls) = fake_discord().await;
        router(&base, vec![]).handle_interaction(interaction("status-server", json!([]))).await;

        let calls = calls.lock();
        assert_eq!(calls[1].0, "edit");
        assert_eq!(calls[1].1["embeds"][0]["color"], COLOR_ONLINE);
    }

    #[tokio::test]
    async fn test_invalid_command_gets_ephemeral_error() {
        let (base, calls) = fake_discord().await;
        router(&base, vec![]).handle_interaction(interaction("ask", json!([]))).await;

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["data"]["flags"], 64);
        assert_eq!(calls[0].1["data"]["embeds"][0]["title"], "❌ Error");
    }

    #[tokio::test]
    async fn test_ping_replies_to_humans_only() {
        let (base, calls) = fake_discord().await;
        let router = router(&base, vec![]);
        let message = |bot: bool| -> Message {
            serde_json::from_value(json!({
                "id": "m1", "channel_id": "c9", "content": "!ping",
                "author": {"id": "u", "username": "u", "bot": bot}
            }))
            .unwrap()
        };

        router.handle_message(message(true)).await;
        router.handle_message(message(false)).await;

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "message:c9");
        assert_eq!(calls[0].1["message_reference"]["message_id"], "m1");
    }
}
