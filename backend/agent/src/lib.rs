//! Recall conversation runner
//!
//! Per-thread state, the query pipeline and the dispatcher that ties chat
//! events to retrieval, generation and replies.

pub mod dispatcher;
pub mod feedback;
pub mod history;
pub mod mention;
pub mod query_pipeline;
pub mod thread_state;

#[cfg(test)]
mod testing;

pub use dispatcher::Dispatcher;
pub use feedback::{FeedbackKind, FeedbackSink, NoopFeedbackSink};
pub use history::fetch_thread_history;
pub use mention::MentionStripper;
pub use query_pipeline::{PipelineAnswer, QueryPipeline};
pub use thread_state::{ThreadState, ThreadStates};
