/// Slack channel adapter for Recall.
///
/// Receives Events API and interactivity webhooks, verifies them with the
/// signing secret and forwards normalized `Message`s to the dispatcher over
/// the EventBus. Replies go out through `SlackClient`.
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ChannelAdapter;
use crate::slack_events::{SlackEnvelope, normalize_event, parse_interaction, verify_signature};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use recall_core::Message;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SlackConfig {
    pub signing_secret: String,
    pub events_path: String,
    pub interactions_path: String,
}

// ---------------------------------------------------------------------------
// Axum state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    signing_secret: String,
    dispatcher_tx: mpsc::Sender<Message>,
}

// ---------------------------------------------------------------------------
// Adapter struct
// ---------------------------------------------------------------------------

pub struct SlackAdapter {
    config: SlackConfig,
    dispatcher_tx: mpsc::Sender<Message>,
}

impl SlackAdapter {
    pub fn new(config: SlackConfig, dispatcher_tx: mpsc::Sender<Message>) -> Self {
        Self { config, dispatcher_tx }
    }
}

#[async_trait]
impl ChannelAdapter for SlackAdapter {
    fn name(&self) -> &str {
        "slack"
    }

    fn build_router(&self) -> Router {
        let state = AppState {
            signing_secret: self.config.signing_secret.clone(),
            dispatcher_tx: self.dispatcher_tx.clone(),
        };
        Router::new()
            .route(&self.config.events_path, post(handle_slack_event))
            .route(&self.config.interactions_path, post(handle_slack_interaction))
            .with_state(state)
    }

    async fn start(&self) -> Result<()> {
        info!(
            events = %self.config.events_path,
            interactions = %self.config.interactions_path,
            "[Slack] Adapter ready (webhook-based)"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Webhook handlers
// ---------------------------------------------------------------------------

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn verified(state: &AppState, headers: &HeaderMap, body: &[u8]) -> bool {
    match verify_signature(
        &state.signing_secret,
        header(headers, "x-slack-signature"),
        header(headers, "x-slack-request-timestamp"),
        body,
        now_secs(),
    ) {
        Ok(()) => true,
        Err(e) => {
            warn!(reason = %e, "[Slack] Rejecting webhook");
            false
        }
    }
}

async fn forward(state: &AppState, message: Message) {
    if let Err(e) = state.dispatcher_tx.send(message).await {
        error!("[Slack] Dispatcher channel closed: {}", e);
    }
}

async fn handle_slack_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    // 1. Verify Slack signature (HMAC-SHA256 over timestamp + body)
    if !verified(&state, &headers, &body) {
        return (StatusCode::UNAUTHORIZED, "invalid_signature").into_response();
    }

    // 2. Slack redelivers when we are slow to ack; the first delivery was already queued
    if let Some(retry) = header(&headers, "x-slack-retry-num") {
        debug!(retry, "[Slack] Dropping retried delivery");
        return (StatusCode::OK, "retry_ignored").into_response();
    }

    // 3. Parse JSON
    let envelope: SlackEnvelope = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(err) => {
            error!("[Slack] Failed to parse event envelope: {}", err);
            return (StatusCode::BAD_REQUEST, "bad_json").into_response();
        }
    };

    // 4. URL-verification challenge (required at initial setup)
    if envelope.envelope_type == "url_verification" {
        if let Some(challenge) = envelope.challenge {
            return (StatusCode::OK, challenge).into_response();
        }
    }

    if envelope.envelope_type != "event_callback" {
        return (StatusCode::OK, "ignored").into_response();
    }
    let Some(message) = envelope.event.and_then(normalize_event) else {
        return (StatusCode::OK, "ignored").into_response();
    };

    forward(&state, message).await;
    (StatusCode::OK, "ok").into_response()
}

async fn handle_slack_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if !verified(&state, &headers, &body) {
        return (StatusCode::UNAUTHORIZED, "invalid_signature").into_response();
    }

    match parse_interaction(&body) {
        Ok(Some(event)) => {
            info!(action = %event.action_id, user = %event.user_id, "[Slack] Button clicked");
            forward(&state, Message::Interaction(event)).await;
            StatusCode::OK.into_response()
        }
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => {
            error!("[Slack] Failed to parse interaction payload: {}", e);
            (StatusCode::BAD_REQUEST, "bad_payload").into_response()
        }
    }
}
