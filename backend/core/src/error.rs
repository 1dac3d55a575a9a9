use thiserror::Error;

/// Top-level error type for the Recall bot.
///
/// The variants name the failure classes of the retrieval pipeline. Which of
/// them reach the user is decided by the caller: a failed similarity query is
/// degraded to "nothing found", everything else surfaces in the reply.
#[derive(Debug, Error)]
pub enum RecallError {
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("storage failed: {0}")]
    Storage(String),

    #[error("generation failed ({provider}): {message}")]
    Generation { provider: String, message: String },

    #[error("chat transport error: {0}")]
    Transport(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_names_provider() {
        let err = RecallError::Generation {
            provider: "bedrock".into(),
            message: "read timed out".into(),
        };
        assert_eq!(err.to_string(), "generation failed (bedrock): read timed out");
    }

    #[test]
    fn invalid_event_names_the_problem() {
        let err = RecallError::InvalidEvent("form body has no payload field".into());
        assert_eq!(err.to_string(), "invalid event: form body has no payload field");
    }
}
