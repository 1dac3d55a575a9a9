//! In-memory chat transport for tests.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use recall_core::{ChatTransport, OutgoingMessage, ThreadMessage, ThreadRepliesPage};

/// Serves canned thread pages and records everything sent.
#[derive(Default)]
pub struct RecordingTransport {
    pages: Vec<Vec<String>>,
    fail_fetch: bool,
    sent: Mutex<Vec<OutgoingMessage>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl RecordingTransport {
    /// Page `i` links to page `i + 1` with cursor `page-{i+1}`.
    pub fn with_pages(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|p| p.into_iter().map(str::to_string).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn fetch_thread_replies(
        &self,
        _channel: &str,
        _thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<ThreadRepliesPage> {
        self.cursors.lock().unwrap().push(cursor.map(str::to_string));
        if self.fail_fetch {
            anyhow::bail!("conversations.replies failed: ratelimited");
        }

        let index = match cursor {
            None => 0,
            Some(c) => c.trim_start_matches("page-").parse::<usize>()?,
        };
        let Some(texts) = self.pages.get(index) else {
            return Ok(ThreadRepliesPage::default());
        };
        let messages = texts
            .iter()
            .enumerate()
            .map(|(i, text)| ThreadMessage {
                ts: format!("{index}.{i}"),
                user: Some("U1".into()),
                text: text.clone(),
            })
            .collect();
        let next_cursor = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(ThreadRepliesPage { messages, next_cursor })
    }
}
