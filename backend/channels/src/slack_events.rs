//! Slack Events API and interactivity payloads
//!
//! Verifies request signatures and turns Slack's wire JSON into the
//! dispatcher's `Message`s.

use hmac::{Hmac, Mac};
use recall_core::{InboundKind, InboundMessage, InteractionEvent, Message, RecallError};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

/// Requests signed longer ago than this are treated as replays.
pub const MAX_REQUEST_AGE_SECS: u64 = 60 * 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("request timestamp is not a number")]
    BadTimestamp,
    #[error("request timestamp is outside the accepted window")]
    Stale,
    #[error("signature mismatch")]
    Mismatch,
}

/// Check `X-Slack-Signature` (`v0=<hex hmac>`) over `v0:{timestamp}:{body}`.
pub fn verify_signature(
    secret: &str,
    signature: Option<&str>,
    timestamp: Option<&str>,
    body: &[u8],
    now_secs: u64,
) -> Result<(), SignatureError> {
    let signature = signature.ok_or(SignatureError::MissingHeader("x-slack-signature"))?;
    let timestamp = timestamp.ok_or(SignatureError::MissingHeader("x-slack-request-timestamp"))?;

    let ts: u64 = timestamp.trim().parse().map_err(|_| SignatureError::BadTimestamp)?;
    if now_secs.abs_diff(ts) > MAX_REQUEST_AGE_SECS {
        return Err(SignatureError::Stale);
    }

    let expected = signature
        .strip_prefix("v0=")
        .and_then(|h| hex::decode(h).ok())
        .ok_or(SignatureError::Mismatch)?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
}

/// Signature header value for `body`; used by tests and local tooling.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return String::new(),
    };
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

// ---------------------------------------------------------------------------
// Events API
// ---------------------------------------------------------------------------

/// Top-level event envelope from the Slack Events API.
#[derive(Deserialize, Debug)]
pub struct SlackEnvelope {
    #[serde(rename = "type")]
    pub envelope_type: String,
    /// Present on `url_verification` challenges.
    pub challenge: Option<String>,
    /// Present on `event_callback`.
    pub event: Option<SlackEvent>,
}

#[derive(Deserialize, Debug)]
pub struct SlackEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// Set on edits, joins, bot posts and other non-plain messages.
    pub subtype: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
    pub channel: Option<String>,
    pub ts: Option<String>,
    pub thread_ts: Option<String>,
    /// If set this is a bot message; ignore.
    pub bot_id: Option<String>,
}

/// Map an `event_callback` event to an inbound message.
///
/// Returns `None` for anything the bot does not react to: other event types,
/// bot posts, message subtypes and events without text, channel or ts.
pub fn normalize_event(event: SlackEvent) -> Option<Message> {
    let kind = match event.event_type.as_str() {
        "app_mention" => InboundKind::Mention,
        "message" => InboundKind::Message,
        _ => return None,
    };
    if event.bot_id.is_some() || event.subtype.is_some() {
        return None;
    }

    Some(Message::Inbound(InboundMessage {
        kind,
        text: event.text?,
        channel: event.channel?,
        ts: event.ts?,
        thread_ts: event.thread_ts,
        user: event.user,
    }))
}

// ---------------------------------------------------------------------------
// Interactivity
// ---------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
struct BlockActionsPayload {
    #[serde(rename = "type")]
    payload_type: String,
    user: IdRef,
    channel: Option<IdRef>,
    message: Option<MessageRef>,
    #[serde(default)]
    actions: Vec<ActionRef>,
}

#[derive(Deserialize, Debug)]
struct IdRef {
    id: String,
}

#[derive(Deserialize, Debug)]
struct MessageRef {
    ts: String,
}

#[derive(Deserialize, Debug)]
struct ActionRef {
    action_id: String,
}

fn invalid(e: impl std::fmt::Display) -> RecallError {
    RecallError::InvalidEvent(e.to_string())
}

/// Decode the `payload=` field of an interactivity form body into the first
/// button action it carries.
pub fn parse_interaction(form_body: &[u8]) -> Result<Option<InteractionEvent>, RecallError> {
    let body = std::str::from_utf8(form_body).map_err(|e| invalid(e))?;
    let raw = body
        .split('&')
        .find_map(|pair| pair.strip_prefix("payload="))
        .ok_or_else(|| invalid("form body has no payload field"))?;
    let json = urlencoding::decode(&raw.replace('+', " "))
        .map_err(|e| invalid(e))?
        .into_owned();

    let payload: BlockActionsPayload = serde_json::from_str(&json).map_err(|e| invalid(e))?;
    if payload.payload_type != "block_actions" {
        return Ok(None);
    }
    let (Some(channel), Some(message), Some(action)) =
        (payload.channel, payload.message, payload.actions.into_iter().next())
    else {
        return Ok(None);
    };

    Ok(Some(InteractionEvent {
        action_id: action.action_id,
        user_id: payload.user.id,
        channel_id: channel.id,
        message_ts: message.ts,
    }))
}
