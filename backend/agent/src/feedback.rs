//! Yes/no feedback on bot answers.

use anyhow::Result;
use async_trait::async_trait;
use recall_channels::slack_blocks::{ACTION_NO, ACTION_YES};
use recall_core::InteractionEvent;

pub const POSITIVE_ACK: &str = "¡Me alegra que te haya servido!";
pub const NEGATIVE_ACK: &str = "Lamento que no haya sido útil. ¡Estoy aquí para ayudar!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Positive,
    Negative,
}

impl FeedbackKind {
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            ACTION_YES => Some(Self::Positive),
            ACTION_NO => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn acknowledgement(self) -> &'static str {
        match self {
            Self::Positive => POSITIVE_ACK,
            Self::Negative => NEGATIVE_ACK,
        }
    }
}

/// Where feedback clicks end up. The bot itself only acknowledges them.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(&self, kind: FeedbackKind, event: &InteractionEvent) -> Result<()>;
}

pub struct NoopFeedbackSink;

#[async_trait]
impl FeedbackSink for NoopFeedbackSink {
    async fn record(&self, _kind: FeedbackKind, _event: &InteractionEvent) -> Result<()> {
        Ok(())
    }
}
