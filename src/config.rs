use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::i18n::Lang;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not configured")]
    MissingToken,
    #[error("failed to read {0}: {1}")]
    Read(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {0}: {1}")]
    InvalidEnv(&'static str, String),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub hoops: HoopsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub reminder_channel_id: Option<String>,
    #[serde(default)]
    pub reminder_guild_id: Option<String>,
    #[serde(default)]
    pub notify_language: Lang,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HoopsConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_website")]
    pub website: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_status_interval")]
    pub status_interval_minutes: u32,
    #[serde(default = "default_morning_hour")]
    pub morning_hour: u32,
    #[serde(default = "default_evening_hour")]
    pub evening_hour: u32,
}

fn default_api_base() -> String { "https://api.hoops.finance".to_string() }
fn default_website() -> String { "https://www.hoops.finance".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_status_interval() -> u32 { 5 }
fn default_morning_hour() -> u32 { 9 }
fn default_evening_hour() -> u32 { 22 }

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            application_id: None,
            reminder_channel_id: None,
            reminder_guild_id: None,
            notify_language: Lang::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for HoopsConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            website: default_website(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            status_interval_minutes: default_status_interval(),
            morning_hour: default_morning_hour(),
            evening_hour: default_evening_hour(),
        }
    }
}

impl Config {
    /// Loads `config.toml` when present, then applies environment overrides.
    /// A `.env` file in the working directory is honored.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::from_file("config.toml")?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("📋 No {} found, using environment variables", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("DISCORD_TOKEN") {
            self.discord.token = Some(token);
        }
        if let Some(id) = non_empty("CLIENT_ID") {
            self.discord.application_id = Some(id);
        }
        if let Some(id) = non_empty("REMINDER_CHANNEL_ID") {
            self.discord.reminder_channel_id = Some(id);
        }
        if let Some(id) = non_empty("REMINDER_GUILD_ID") {
            self.discord.reminder_guild_id = Some(id);
        }
        if let Some(port) = non_empty("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("PORT", port))?;
        }
        Ok(())
    }

    /// The bot credential is the only value whose absence is fatal.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.discord
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    pub fn reminder_destination(&self) -> Option<(String, String)> {
        match (&self.discord.reminder_guild_id, &self.discord.reminder_channel_id) {
            (Some(guild), Some(channel)) => Some((guild.clone(), channel.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_reference_cadence() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.hoops.api_base, "https://api.hoops.finance");
        assert_eq!(config.hoops.timeout_secs, 10);
        assert_eq!(config.discord.timeout_secs, 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.schedule.status_interval_minutes, 5);
        assert_eq!(config.schedule.morning_hour, 9);
        assert_eq!(config.schedule.evening_hour, 22);
        assert_eq!(config.discord.notify_language, Lang::Es);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config = toml::from_str(
            r#"
            [discord]
            token = "from-file"
            reminder_channel_id = "1"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("DISCORD_TOKEN", "from-env"),
            ("REMINDER_GUILD_ID", "42"),
            ("PORT", "3000"),
            ("CLIENT_ID", "  "),
        ]
        .into_iter()
        .collect();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.token().unwrap(), "from-env");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.discord.application_id, None);
        assert_eq!(
            config.reminder_destination(),
            Some(("42".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn test_discord_and_hoops_timeouts_are_independent() {
        let config: Config = toml::from_str(
            r#"
            [discord]
            timeout_secs = 30

            [hoops]
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.discord.timeout_secs, 30);
        assert_eq!(config.hoops.timeout_secs, 3);
        assert_eq!(Config::default().discord.timeout_secs, 10);
    }

    #[test]
    fn test_missing_token_is_reported() {
        let config = Config::default();
        assert!(matches!(config.token(), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env(|k| (k == "PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnv("PORT", _))));
    }
}
