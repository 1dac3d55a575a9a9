use serde::{Deserialize, Serialize};

/// Events delivered by a chat adapter to the dispatcher over the EventBus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Adapter → Dispatcher: a user posted text the bot may answer
    Inbound(InboundMessage),
    /// Adapter → Dispatcher: a user clicked an interactive button
    Interaction(InteractionEvent),
}

/// How the inbound message reached the bot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InboundKind {
    /// The bot was explicitly mentioned.
    Mention,
    /// A plain channel or thread message.
    Message,
}

/// A normalized "message received" event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub kind: InboundKind,
    pub text: String,
    pub channel: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub user: Option<String>,
}

impl InboundMessage {
    /// The thread key: the root message timestamp, or the message's own `ts`
    /// when it starts a new thread.
    pub fn thread_key(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

/// A button click from an interactive message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub action_id: String,
    pub user_id: String,
    pub channel_id: String,
    /// Timestamp of the message carrying the buttons; replies thread under it.
    pub message_ts: String,
}

/// A reply the bot posts back to the chat platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutgoingMessage {
    pub channel: String,
    pub thread_ts: String,
    pub text: String,
    /// Optional rich layout (Slack Block Kit array).
    pub blocks: Option<serde_json::Value>,
}

impl OutgoingMessage {
    pub fn text(channel: impl Into<String>, thread_ts: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            thread_ts: thread_ts.into(),
            text: text.into(),
            blocks: None,
        }
    }

    pub fn with_blocks(mut self, blocks: serde_json::Value) -> Self {
        self.blocks = Some(blocks);
        self
    }
}

/// One message of a thread transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadMessage {
    pub ts: String,
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// One page of `fetch_thread_replies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadRepliesPage {
    pub messages: Vec<ThreadMessage>,
    /// Cursor for the next page; `None` (or empty) when the thread is drained.
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(ts: &str, thread_ts: Option<&str>) -> InboundMessage {
        InboundMessage {
            kind: InboundKind::Mention,
            text: "hola".into(),
            channel: "C1".into(),
            ts: ts.into(),
            thread_ts: thread_ts.map(String::from),
            user: Some("U1".into()),
        }
    }

    #[test]
    fn thread_key_prefers_thread_ts() {
        assert_eq!(inbound("2.0", Some("1.0")).thread_key(), "1.0");
        assert_eq!(inbound("2.0", None).thread_key(), "2.0");
    }

    #[test]
    fn message_serialization_is_tagged() {
        let msg = Message::Interaction(InteractionEvent {
            action_id: "response_yes".into(),
            user_id: "U1".into(),
            channel_id: "C1".into(),
            message_ts: "1.0".into(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "interaction");
        let back: Message = serde_json::from_value(json).unwrap();
        assert!(matches!(back, Message::Interaction(e) if e.action_id == "response_yes"));
    }
}
