//! Config defaults.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_EVENTS_PATH: &str = "/slack/events";

pub const DEFAULT_INTERACTIONS_PATH: &str = "/slack/interactions";

pub const DEFAULT_REGION: &str = "us-east-1";

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";

pub const DEFAULT_EMBED_MODEL_ID: &str = "cohere.embed-multilingual-v3";

pub const DEFAULT_DB_PATH: &str = "recall.db";

pub const DEFAULT_COLLECTION: &str = "default";

/// Distances above this are "not relevant enough" to enter the context.
pub const DEFAULT_MAX_DISTANCE: f32 = 1.0;

/// One day without activity resets a thread to inactive.
pub const DEFAULT_THREAD_TTL_SECS: u64 = 24 * 3600;

pub const DEFAULT_MAX_THREADS: u64 = 10_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";
