//! The slice of a GitHub `issue_comment` / `pull_request_review_comment`
//! payload that the relay reads.
//!
//! Every field is optional and decoded leniently: a value of the wrong JSON
//! type is treated the same as a missing one.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: Option<Comment>,
    #[serde(default, deserialize_with = "lenient")]
    pub issue: Option<Issue>,
    #[serde(default, deserialize_with = "lenient")]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub html_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<CommentAuthor>,
    /// Only present on inline review comments.
    #[serde(default, deserialize_with = "lenient")]
    pub pull_request_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentAuthor {
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Set when the "issue" is really a pull request.
    #[serde(default, deserialize_with = "lenient")]
    pub pull_request: Option<IssuePullRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssuePullRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
}

/// Where a comment was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    PullRequest,
    Issue,
}

/// Why an event was accepted without doing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedAction(Option<String>),
    MissingComment,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnsupportedAction(Some(action)) => {
                write!(f, "{action} is not a created event")
            }
            SkipReason::UnsupportedAction(None) => write!(f, "event has no action"),
            SkipReason::MissingComment => write!(f, "comment field not found"),
        }
    }
}

/// A freshly created comment, borrowed from its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedComment<'a> {
    pub body: &'a str,
    pub origin: Origin,
    pub title: Option<&'a str>,
    pub html_url: Option<&'a str>,
    pub created_at: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}

impl CommentEvent {
    /// Decodes an already-parsed payload. Anything that is not a JSON object
    /// decodes to an event with no fields.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn classify(&self) -> Result<CreatedComment<'_>, SkipReason> {
        if self.action.as_deref() != Some("created") {
            return Err(SkipReason::UnsupportedAction(self.action.clone()));
        }

        let comment = self.comment.as_ref().ok_or(SkipReason::MissingComment)?;
        let body = comment.body.as_deref().ok_or(SkipReason::MissingComment)?;

        let is_review_comment = comment.pull_request_url.is_some();
        let is_pr_comment = self
            .issue
            .as_ref()
            .and_then(|issue| issue.pull_request.as_ref())
            .and_then(|pr| pr.url.as_ref())
            .is_some();

        let origin = if is_pr_comment || is_review_comment {
            Origin::PullRequest
        } else {
            Origin::Issue
        };

        let title = if is_review_comment {
            self.pull_request.as_ref().and_then(|pr| pr.title.as_deref())
        } else {
            self.issue.as_ref().and_then(|issue| issue.title.as_deref())
        };

        Ok(CreatedComment {
            body,
            origin,
            title,
            html_url: comment.html_url.as_deref(),
            created_at: comment.created_at.as_deref(),
            avatar_url: comment
                .user
                .as_ref()
                .and_then(|user| user.avatar_url.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> CommentEvent {
        CommentEvent::from_value(value)
    }

    #[test]
    fn test_issue_comment() {
        let event = parse(json!({
            "action": "created",
            "issue": { "title": "Broken build" },
            "comment": {
                "body": "@alice please look",
                "html_url": "https://github.com/o/r/issues/1#issuecomment-9",
                "created_at": "2024-05-01T10:00:00Z",
                "user": { "avatar_url": "https://avatars.example/u/1" }
            }
        }));

        let comment = event.classify().unwrap();
        assert_eq!(comment.origin, Origin::Issue);
        assert_eq!(comment.body, "@alice please look");
        assert_eq!(comment.title, Some("Broken build"));
        assert_eq!(
            comment.html_url,
            Some("https://github.com/o/r/issues/1#issuecomment-9")
        );
        assert_eq!(comment.created_at, Some("2024-05-01T10:00:00Z"));
        assert_eq!(comment.avatar_url, Some("https://avatars.example/u/1"));
    }

    #[test]
    fn test_pr_conversation_comment() {
        let event = parse(json!({
            "action": "created",
            "issue": {
                "title": "Add relay",
                "pull_request": { "url": "https://api.github.com/repos/o/r/pulls/2" }
            },
            "comment": { "body": "@alice" }
        }));

        let comment = event.classify().unwrap();
        assert_eq!(comment.origin, Origin::PullRequest);
        assert_eq!(comment.title, Some("Add relay"));
    }

    #[test]
    fn test_review_comment_takes_pull_request_title() {
        let event = parse(json!({
            "action": "created",
            "issue": { "title": "issue title" },
            "pull_request": { "title": "Review me" },
            "comment": {
                "body": "@alice nit",
                "pull_request_url": "https://api.github.com/repos/o/r/pulls/3"
            }
        }));

        let comment = event.classify().unwrap();
        assert_eq!(comment.origin, Origin::PullRequest);
        assert_eq!(comment.title, Some("Review me"));
    }

    #[test]
    fn test_other_actions_are_skipped() {
        let event = parse(json!({ "action": "edited", "comment": { "body": "@alice" } }));
        assert_eq!(
            event.classify(),
            Err(SkipReason::UnsupportedAction(Some("edited".to_string())))
        );

        let event = parse(json!({ "comment": { "body": "@alice" } }));
        assert_eq!(event.classify(), Err(SkipReason::UnsupportedAction(None)));
    }

    #[test]
    fn test_missing_or_mistyped_body_is_skipped() {
        let event = parse(json!({ "action": "created" }));
        assert_eq!(event.classify(), Err(SkipReason::MissingComment));

        let event = parse(json!({ "action": "created", "comment": { "body": 42 } }));
        assert_eq!(event.classify(), Err(SkipReason::MissingComment));

        let event = parse(json!({ "action": "created", "comment": "text" }));
        assert_eq!(event.classify(), Err(SkipReason::MissingComment));
    }

    #[test]
    fn test_mistyped_optional_fields_degrade_to_none() {
        let event = parse(json!({
            "action": "created",
            "issue": { "title": null, "pull_request": { "url": 7 } },
            "comment": { "body": "hi", "user": "ghost", "created_at": 1 }
        }));

        let comment = event.classify().unwrap();
        assert_eq!(comment.origin, Origin::Issue);
        assert_eq!(comment.title, None);
        assert_eq!(comment.avatar_url, None);
        assert_eq!(comment.created_at, None);
    }

    #[test]
    fn test_non_object_payload() {
        let event = parse(json!([1, 2, 3]));
        assert_eq!(event.classify(), Err(SkipReason::UnsupportedAction(None)));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::UnsupportedAction(Some("deleted".to_string())).to_string(),
            "deleted is not a created event"
        );
        assert_eq!(SkipReason::MissingComment.to_string(), "comment field not found");
    }
}
