use async_trait::async_trait;

pub mod slack;
pub mod slack_blocks;
pub mod slack_client;
pub mod slack_events;

pub use slack::{SlackAdapter, SlackConfig};
pub use slack_client::SlackClient;

/// Chat platform adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Build an Axum sub-router for inbound webhook endpoints.
    fn build_router(&self) -> axum::Router {
        axum::Router::new()
    }

    /// Start the adapter's background work, if any.
    async fn start(&self) -> anyhow::Result<()>;
}
