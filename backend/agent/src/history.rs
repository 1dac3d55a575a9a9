//! Thread transcript assembly.

use anyhow::{Context, Result};
use recall_core::ChatTransport;
use tracing::debug;

/// Every message text of the thread, oldest first, joined with single spaces.
/// Follows `next_cursor` until the thread is drained.
pub async fn fetch_thread_history(
    transport: &dyn ChatTransport,
    channel: &str,
    thread_ts: &str,
) -> Result<String> {
    let mut texts: Vec<String> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = transport
            .fetch_thread_replies(channel, thread_ts, cursor.as_deref())
            .await
            .with_context(|| format!("Failed to fetch replies of thread {thread_ts}"))?;
        pages += 1;
        texts.extend(page.messages.into_iter().map(|m| m.text));

        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(thread_ts, pages, messages = texts.len(), "Fetched thread history");
    Ok(texts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn drains_all_pages() {
        let transport = RecordingTransport::with_pages(vec![
            vec!["¿Cómo", "configuro"],
            vec!["la", "VPN?"],
            vec!["Con el cliente nuevo."],
        ]);
        let history = fetch_thread_history(&transport, "C1", "1.0").await.unwrap();
        assert_eq!(history, "¿Cómo configuro la VPN? Con el cliente nuevo.");
        assert_eq!(transport.cursors(), vec![None, Some("page-1".to_string()), Some("page-2".to_string())]);
    }

    #[tokio::test]
    async fn empty_thread_is_empty_string() {
        let transport = RecordingTransport::default();
        assert_eq!(fetch_thread_history(&transport, "C1", "1.0").await.unwrap(), "");
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let transport = RecordingTransport::default().failing_fetch();
        let err = fetch_thread_history(&transport, "C1", "9.9").await.unwrap_err();
        assert!(format!("{err:#}").contains("9.9"));
    }
}
