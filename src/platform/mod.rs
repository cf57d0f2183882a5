pub mod discord;

use anyhow::Result;
use async_trait::async_trait;

use crate::platform::discord::DiscordMessage;

/// Something that can deliver a composed notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &DiscordMessage) -> Result<()>;
}
