pub mod providers;
pub mod text_generator;

pub use providers::{BedrockProvider, MockProvider};
pub use text_generator::TextGenerator;
