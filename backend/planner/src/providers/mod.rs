pub mod bedrock;
pub mod mock;

pub use bedrock::BedrockProvider;
pub use mock::MockProvider;
