use crate::config::{MessageFormat, NotificationConfig};
use crate::github::{CreatedComment, Origin};
use crate::platform::discord::{DiscordMessage, Embed, EmbedFooter, EmbedImage};

pub const GREETING: &str = "クルッポー";
pub const PULL_REQUEST_LINE: &str = "ポッポー（PRでメンションされています。）";
pub const ISSUE_LINE: &str = "ポッポー（Issueでメンションされています。）";

/// Accent color of the embed sidebar (#2b2b2b).
pub const EMBED_COLOR: u32 = 2829099;

fn origin_line(origin: Origin) -> &'static str {
    match origin {
        Origin::PullRequest => PULL_REQUEST_LINE,
        Origin::Issue => ISSUE_LINE,
    }
}

/// `<@id>さん`, the Discord user reference plus honorific.
pub fn mention_ref(discord_id: &str) -> String {
    format!("<@{discord_id}>さん")
}

/// Greeting, origin line, then the resolved users. The last line is empty
/// when nobody resolved.
pub fn compose_content(origin: Origin, discord_ids: &[&str]) -> String {
    let mentions = discord_ids
        .iter()
        .map(|id| mention_ref(id))
        .collect::<Vec<_>>()
        .join(" ");

    format!("{GREETING}\n{}\n{mentions}", origin_line(origin))
}

pub fn compose(
    comment: &CreatedComment<'_>,
    discord_ids: &[&str],
    settings: &NotificationConfig,
) -> DiscordMessage {
    let content = compose_content(comment.origin, discord_ids);

    match settings.format {
        MessageFormat::Plain => DiscordMessage {
            username: None,
            avatar_url: None,
            content,
            embeds: Vec::new(),
        },
        MessageFormat::Embed => DiscordMessage {
            username: Some(settings.username.clone()),
            avatar_url: Some(settings.avatar_url.clone()),
            content,
            embeds: vec![Embed {
                title: comment.title.unwrap_or_default().to_string(),
                description: comment.body.to_string(),
                url: comment.html_url.unwrap_or_default().to_string(),
                color: EMBED_COLOR,
                footer: EmbedFooter {
                    text: comment.created_at.unwrap_or_default().to_string(),
                },
                thumbnail: EmbedImage {
                    url: comment.avatar_url.unwrap_or_default().to_string(),
                },
            }],
        },
    }
}
