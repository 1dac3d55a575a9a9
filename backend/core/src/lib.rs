pub mod channel;
pub mod error;
pub mod message;
pub mod traits;

pub use channel::EventBus;
pub use error::RecallError;
pub use message::{
    InboundKind, InboundMessage, InteractionEvent, Message, OutgoingMessage, ThreadMessage,
    ThreadRepliesPage,
};
pub use traits::{ChatTransport, LlmProvider, LlmRequest, LlmResponse};
