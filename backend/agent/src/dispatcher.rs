//! Conversation dispatcher.
//!
//! Consumes chat events one at a time and decides per thread whether to
//! answer, memorize the thread, go quiet, or acknowledge feedback.

use std::sync::Arc;

use recall_channels::slack_blocks::{self, FEEDBACK_PROMPT};
use recall_core::{
    ChatTransport, InboundKind, InboundMessage, InteractionEvent, Message, OutgoingMessage,
    RecallError,
};
use recall_logging::{DispatchEvent, EventLogger};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::feedback::{FeedbackKind, FeedbackSink, NoopFeedbackSink};
use crate::history::fetch_thread_history;
use crate::mention::MentionStripper;
use crate::query_pipeline::QueryPipeline;
use crate::thread_state::{ThreadState, ThreadStates};

pub const MEMORIZED_REPLY: &str = "¡He memorizado el resumen del hilo!";

const THANKS_KEYWORD: &str = "gracias";
const MEMORIZE_KEYWORD: &str = "memorizar";

/// What a thread message asks the bot to do, once thanks are ruled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Memorize,
    Answer,
    FollowUp,
}

fn is_thanks(text: &str) -> bool {
    text.to_lowercase().contains(THANKS_KEYWORD)
}

fn classify(state: ThreadState, raw: &str) -> Intent {
    match state {
        ThreadState::Inactive if raw.to_lowercase().contains(MEMORIZE_KEYWORD) => {
            Intent::Memorize
        }
        ThreadState::Inactive => Intent::Answer,
        ThreadState::Active => Intent::FollowUp,
    }
}

pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    pipeline: Arc<QueryPipeline>,
    states: ThreadStates,
    mentions: MentionStripper,
    feedback: Arc<dyn FeedbackSink>,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        pipeline: Arc<QueryPipeline>,
        states: ThreadStates,
        mentions: MentionStripper,
    ) -> Self {
        Self {
            transport,
            pipeline,
            states,
            mentions,
            feedback: Arc::new(NoopFeedbackSink),
        }
    }

    pub fn with_feedback_sink(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = sink;
        self
    }

    pub fn states(&self) -> &ThreadStates {
        &self.states
    }

    /// Handle events until the bus closes.
    pub async fn start(&self, mut rx: mpsc::Receiver<Message>) {
        info!("Dispatcher started");
        while let Some(message) = rx.recv().await {
            self.handle(message).await;
        }
        info!("Dispatcher stopped: event bus closed");
    }

    pub async fn handle(&self, message: Message) {
        match message {
            Message::Inbound(inbound) => self.handle_inbound(inbound).await,
            Message::Interaction(event) => self.handle_interaction(event).await,
        }
    }

    #[instrument(skip_all, fields(thread = %msg.thread_key(), kind = ?msg.kind))]
    async fn handle_inbound(&self, msg: InboundMessage) {
        let raw = msg.text.as_str();
        if raw.trim().is_empty() {
            return;
        }
        // app_mention delivers the same text; answering both would reply twice
        if msg.kind == InboundKind::Message && self.mentions.mentions_bot(raw) {
            debug!("Skipping message event that mentions the bot");
            return;
        }

        let thread = msg.thread_key().to_string();
        let state = self.states.get(&thread);
        if msg.kind == InboundKind::Message && state == ThreadState::Inactive {
            return;
        }

        let cleaned = self.mentions.strip(raw);
        if cleaned.is_empty() {
            return;
        }

        if is_thanks(&cleaned) {
            self.states.deactivate(&thread);
            EventLogger::log_event(&thread, DispatchEvent::Silenced);
            if is_thanks(raw) {
                let prompt = OutgoingMessage::text(&msg.channel, &thread, FEEDBACK_PROMPT)
                    .with_blocks(slack_blocks::feedback_prompt());
                self.send(&thread, &prompt).await;
                EventLogger::log_event(&thread, DispatchEvent::FeedbackRequested);
            }
            return;
        }

        let intent = classify(state, raw);
        debug!(?state, ?intent, "Classified message");

        let reply = match self.compute_reply(intent, &msg, &thread, &cleaned).await {
            Ok((text, event)) => {
                self.states.activate(&thread);
                EventLogger::log_event(&thread, event);
                text
            }
            Err(e) => {
                error!(error = ?e, "Failed to handle message");
                let text = e.to_string();
                EventLogger::log_event(&thread, DispatchEvent::Failed { error_msg: text.clone() });
                text
            }
        };

        self.send(&thread, &OutgoingMessage::text(&msg.channel, &thread, reply)).await;
    }

    async fn compute_reply(
        &self,
        intent: Intent,
        msg: &InboundMessage,
        thread: &str,
        cleaned: &str,
    ) -> Result<(String, DispatchEvent), RecallError> {
        match intent {
            Intent::Memorize => {
                let history = self.history(&msg.channel, thread).await?;
                let summary = self.pipeline.generator().generate_summary(&history).await?;
                let document_ids = self.pipeline.documents().store_documents(&[summary]).await?;
                Ok((MEMORIZED_REPLY.to_string(), DispatchEvent::Memorized { document_ids }))
            }
            Intent::Answer | Intent::FollowUp => {
                let history = if intent == Intent::FollowUp {
                    Some(self.history(&msg.channel, thread).await?)
                } else {
                    None
                };
                let answer = self.pipeline.run(cleaned, history.as_deref()).await?;
                let event = DispatchEvent::Answered {
                    query: cleaned.to_string(),
                    document_id: answer.document_id,
                    used_history: history.is_some(),
                };
                Ok((answer.text, event))
            }
        }
    }

    async fn history(&self, channel: &str, thread: &str) -> Result<String, RecallError> {
        fetch_thread_history(self.transport.as_ref(), channel, thread)
            .await
            .map_err(|e| RecallError::Transport(format!("{e:#}")))
    }

    #[instrument(skip_all, fields(action = %event.action_id, user = %event.user_id))]
    async fn handle_interaction(&self, event: InteractionEvent) {
        let Some(kind) = FeedbackKind::from_action_id(&event.action_id) else {
            debug!("Ignoring unknown action");
            return;
        };

        if let Err(e) = self.feedback.record(kind, &event).await {
            warn!(error = ?e, "Feedback sink failed");
        }
        EventLogger::log_event(
            &event.message_ts,
            DispatchEvent::Feedback {
                action_id: event.action_id.clone(),
                user_id: event.user_id.clone(),
            },
        );

        let ack = OutgoingMessage::text(&event.channel_id, &event.message_ts, kind.acknowledgement());
        self.send(&event.message_ts, &ack).await;
    }

    async fn send(&self, thread: &str, message: &OutgoingMessage) {
        if let Err(e) = self.transport.send(message).await {
            error!(thread, error = ?e, "Failed to send reply");
        }
    }
}
