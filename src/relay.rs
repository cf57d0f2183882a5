//! Inbound webhook endpoint.
//!
//! Every path is routed to [`handle_webhook`], which runs one request through
//! the pipeline: validate, parse, classify, extract mentions, resolve them,
//! compose the Discord message and deliver it.

use std::sync::Arc;

use axum::body::{self, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::compose::compose;
use crate::config::{Config, NotificationConfig};
use crate::github::CommentEvent;
use crate::identity::UserDirectory;
use crate::mention::extract_mentions;
use crate::platform::Notifier;

/// Shared application state. Built once at startup and never mutated.
pub struct AppState {
    directory: UserDirectory,
    notification: NotificationConfig,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            directory: UserDirectory::new(config.users.values().cloned()),
            notification: config.notification.clone(),
            notifier,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request is not POST: {0}")]
    NotPost(Method),

    #[error("request doesn't have 'Content-Type: application/json'")]
    NotJson,

    #[error("failed to read request body: {0}")]
    BodyRead(axum::Error),

    #[error("failed to parse request body to json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to deliver notification: {0:#}")]
    Delivery(anyhow::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::NotPost(_) | RelayError::NotJson | RelayError::BodyRead(_) => {
                StatusCode::BAD_REQUEST.into_response()
            }
            RelayError::InvalidJson(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to parse request body to json",
            )
                .into_response(),
            RelayError::Delivery(_) => StatusCode::BAD_GATEWAY.into_response(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handle_webhook)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
}

pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<StatusCode, RelayError> {
    let (parts, body) = request.into_parts();

    if parts.method != Method::POST {
        let err = RelayError::NotPost(parts.method);
        warn!("{}", err);
        return Err(err);
    }

    if !is_json(&parts.headers) {
        warn!("{}", RelayError::NotJson);
        return Err(RelayError::NotJson);
    }

    let body = body::to_bytes(body, usize::MAX).await.map_err(|e| {
        let err = RelayError::BodyRead(e);
        warn!("{}", err);
        err
    })?;

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        let err = RelayError::InvalidJson(e);
        error!("{}", err);
        err
    })?;
    debug!("Webhook payload: {}", payload);

    let event = CommentEvent::from_value(payload);
    let comment = match event.classify() {
        Ok(comment) => comment,
        Err(reason) => {
            info!("Nothing to relay: {}", reason);
            return Ok(StatusCode::OK);
        }
    };

    let mentions = extract_mentions(comment.body);
    if mentions.is_empty() {
        info!("No one mentioned");
        return Ok(StatusCode::OK);
    }
    info!("Parsed mentions: {:?} ({:?} comment)", mentions, comment.origin);

    let discord_ids = state.directory.resolve_all(&mentions);
    let message = compose(&comment, &discord_ids, &state.notification);

    if let Err(e) = state.notifier.notify(&message).await {
        let err = RelayError::Delivery(e);
        error!("{}", err);
        return Err(err);
    }

    info!(
        "Relayed comment {} to {} Discord user(s)",
        comment.html_url.unwrap_or("<no url>"),
        discord_ids.len()
    );
    Ok(StatusCode::OK)
}
