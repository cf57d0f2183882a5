use thiserror::Error;
use tracing::{debug, info};

use crate::config::UserRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0} not found")]
    HandleNotFound(String),
}

/// Read-only lookup table from GitHub handles to Discord user IDs.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// Resolves a mention token such as `@alice` to a Discord ID.
    ///
    /// Matching is exact and case-sensitive; the first matching record wins.
    pub fn resolve(&self, mention: &str) -> Result<&str, ResolveError> {
        let handle = mention.strip_prefix('@').unwrap_or(mention);
        self.users
            .iter()
            .find(|user| user.github_id == handle)
            .map(|user| user.discord_id.as_str())
            .ok_or_else(|| ResolveError::HandleNotFound(handle.to_string()))
    }

    /// Resolves each mention in turn. Unknown handles are logged and skipped.
    pub fn resolve_all<'a>(&'a self, mentions: &[&str]) -> Vec<&'a str> {
        let mut targets = Vec::with_capacity(mentions.len());
        for mention in mentions {
            match self.resolve(mention) {
                Ok(discord_id) => {
                    debug!(mention, discord_id, "Resolved mention");
                    targets.push(discord_id);
                }
                Err(e) => info!("Skipping mention: {}", e),
            }
        }
        targets
    }
}
