use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Shape of the outbound Discord payload.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    /// `username`, `avatar_url`, `content` and a single embed.
    #[default]
    Embed,
    /// Only `content`.
    Plain,
}

impl std::fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageFormat::Embed => write!(f, "embed"),
            MessageFormat::Plain => write!(f, "plain"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "discord_webhook_url")]
    pub webhook_url: String,
    #[serde(default)]
    pub users: HashMap<String, UserRecord>,
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// One GitHub account and the Discord user it should ping.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub github_id: String,
    pub discord_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Display name the webhook posts as.
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,
    #[serde(default)]
    pub format: MessageFormat,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            avatar_url: default_avatar_url(),
            format: MessageFormat::default(),
        }
    }
}

fn default_username() -> String {
    "伝書鳩".to_string()
}

fn default_avatar_url() -> String {
    "http://pancos-sozai.com/wp-content/uploads/%E3%83%8F%E3%83%88%E3%81%AE%E3%82%A4%E3%83%A9%E3%82%B9%E3%83%88%E7%B4%A0%E6%9D%9011.png"
        .to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.webhook_url.trim().is_empty() {
            anyhow::bail!("discord_webhook_url must not be empty");
        }

        Ok(config)
    }
}

/// Port to listen on, taken from the `PORT` environment variable.
pub fn listen_port() -> Result<u16> {
    parse_port(std::env::var("PORT").ok())
}

fn parse_port(value: Option<String>) -> Result<u16> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid PORT value: {raw:?}")),
    }
}
