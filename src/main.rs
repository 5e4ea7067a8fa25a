mod api;
mod config;
mod discord;
mod i18n;
mod models;
mod services;
mod sources;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{CommandRouter, HealthState};
use config::Config;
use discord::{DiscordHttp, Gateway};
use services::{scheduler, AvailabilityMonitor, Destination, Notifier};
use sources::{hoops::HoopsApi, website::WebsiteProbe, PoolSource};

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hoops_helper=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config = Config::load()?;
    let token = match config.token() {
        Ok(token) => token.to_string(),
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::error!("Set DISCORD_TOKEN in the environment, a .env file or [discord] in config.toml");
            tracing::error!("Example: DISCORD_TOKEN=your_token_here");
            std::process::exit(1);
        }
    };

    let http = Arc::new(DiscordHttp::new(
        &token,
        Duration::from_secs(config.discord.timeout_secs),
    )?);

    // One-shot mode: refresh the global slash commands and exit
    if args.iter().any(|a| a == "--register-commands") {
        let application_id = match &config.discord.application_id {
            Some(id) => id.clone(),
            None => http.current_application().await?.id,
        };
        if let Err(e) = api::commands::register_commands(&http, &application_id).await {
            tracing::error!("❌ Failed to register commands: {}", e);
            if let Some(hint) = e.hint() {
                tracing::info!("💡 {}", hint);
            }
            return Err(e.into());
        }
        return Ok(());
    }

    tracing::info!("🚀 Starting bot...");
    tracing::info!("   - Token: ✅ configured");
    tracing::info!(
        "   - Reminder channel: {}",
        config.discord.reminder_channel_id.as_deref().unwrap_or("❌ not configured")
    );
    tracing::info!(
        "   - Guild: {}",
        config.discord.reminder_guild_id.as_deref().unwrap_or("❌ not configured")
    );

    let timeout = Duration::from_secs(config.hoops.timeout_secs);
    let pools: Arc<dyn PoolSource> = Arc::new(HoopsApi::new(&config.hoops.api_base, timeout)?);
    let probe = Arc::new(WebsiteProbe::new(&config.hoops.website, timeout)?);

    let destination = config
        .reminder_destination()
        .map(|(guild_id, channel_id)| Destination { guild_id, channel_id });
    let notifier = Arc::new(Notifier::new(
        http.clone(),
        destination,
        &config.hoops.website,
        config.discord.notify_language,
        pools.clone(),
    ));
    let monitor = Arc::new(AvailabilityMonitor::new(probe, notifier.clone()));

    // Background: liveness probe
    let health_state = Arc::new(HealthState {
        monitor: monitor.clone(),
        started: Instant::now(),
    });
    let server_config = config.server.clone();
    tokio::spawn(async move {
        if let Err(e) = api::health::serve(server_config, health_state).await {
            tracing::error!("❌ Health check server failed: {}", e);
        }
    });

    // Background: startup check, 5-minute checks, daily reminders
    scheduler::start(monitor.clone(), notifier, &config.schedule);

    let router = Arc::new(CommandRouter::new(
        http,
        pools,
        monitor,
        &config.hoops.website,
        config.schedule.clone(),
    ));
    let gateway = Gateway::new(&token, router);

    tokio::select! {
        result = gateway.run() => {
            if let Err(e) = result {
                tracing::error!("❌ Discord connection failed: {}", e);
                if let Some(hint) = e.hint() {
                    tracing::info!("💡 {}", hint);
                }
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}
