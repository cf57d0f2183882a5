use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::platform::Notifier;

/// Body of a Discord incoming-webhook call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiscordMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub footer: EmbedFooter,
    pub thumbnail: EmbedImage,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedImage {
    pub url: String,
}

pub struct DiscordWebhook {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordWebhook {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn notify(&self, message: &DiscordMessage) -> Result<()> {
        // serde_json leaves <, > and & alone, so <@id> survives as-is.
        let body = serde_json::to_vec(message).context("Failed to serialize Discord message")?;

        debug!("Posting notification to Discord ({} bytes)", body.len());

        let response = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to send request to Discord")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Discord webhook error ({}): {}", status, error_body);
        }

        Ok(())
    }
}
