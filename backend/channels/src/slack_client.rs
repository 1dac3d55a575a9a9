/// Slack Web API client.
///
/// Implements `ChatTransport` over `chat.postMessage` and
/// `conversations.replies`, and resolves the bot's own user id with
/// `auth.test`. Slack answers most failures with HTTP 200 and `"ok": false`,
/// so every call checks the body as well as the status.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use recall_core::{ChatTransport, OutgoingMessage, ThreadMessage, ThreadRepliesPage};

pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Page size for `conversations.replies`.
pub const REPLIES_PAGE_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    bot_token: String,
    base_url: String,
}

impl SlackClient {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            bot_token: bot_token.into(),
            base_url: SLACK_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// The bot's own user id, as Slack sees the token.
    pub async fn auth_test(&self) -> Result<String> {
        let res: AuthTestResponse = self
            .call(self.http.post(format!("{}/auth.test", self.base_url)))
            .await
            .context("auth.test failed")?;
        info!(user_id = %res.user_id, "[Slack] Resolved bot user id");
        Ok(res.user_id)
    }

    async fn call<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.bot_token)
            .send()
            .await?
            .error_for_status()?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        if !envelope.ok {
            anyhow::bail!(
                "Slack API error: {}",
                envelope.error.as_deref().unwrap_or("unknown_error")
            );
        }
        envelope
            .body
            .context("Slack API returned ok without a body")
    }
}

// ---------------------------------------------------------------------------
// Slack wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    error: Option<String>,
    #[serde(flatten)]
    body: Option<T>,
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    thread_ts: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<&'a serde_json::Value>,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    #[serde(default)]
    ts: Option<String>,
}

#[derive(Deserialize)]
struct RepliesResponse {
    #[serde(default)]
    messages: Vec<ThreadMessage>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct AuthTestResponse {
    user_id: String,
}

#[async_trait]
impl ChatTransport for SlackClient {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let body = PostMessage {
            channel: &message.channel,
            text: &message.text,
            thread_ts: &message.thread_ts,
            blocks: message.blocks.as_ref(),
        };
        let res: PostMessageResponse = self
            .call(self.http.post(format!("{}/chat.postMessage", self.base_url)).json(&body))
            .await
            .context("chat.postMessage failed")?;
        debug!(channel = %message.channel, ts = ?res.ts, "[Slack] Sent message");
        Ok(())
    }

    async fn fetch_thread_replies(
        &self,
        channel: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<ThreadRepliesPage> {
        let limit = REPLIES_PAGE_LIMIT.to_string();
        let mut query = vec![("channel", channel), ("ts", thread_ts), ("limit", limit.as_str())];
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor));
        }

        let res: RepliesResponse = self
            .call(
                self.http
                    .get(format!("{}/conversations.replies", self.base_url))
                    .query(&query),
            )
            .await
            .context("conversations.replies failed")?;

        let next_cursor = res
            .response_metadata
            .and_then(|m| m.next_cursor)
            .filter(|c| !c.is_empty());
        Ok(ThreadRepliesPage {
            messages: res.messages,
            next_cursor,
        })
    }
}
