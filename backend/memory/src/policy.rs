//! How store failures surface to callers.
//!
//! Reads and writes fail differently on purpose: a broken similarity query
//! should not stop the bot from answering, while a lost write must be seen.

use recall_core::RecallError;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log and continue with an empty result.
    DegradeOnReadError,
    /// Log and return the error.
    FailOnWriteError,
}

impl ErrorPolicy {
    /// The policy the document store applies to `op` unless told otherwise.
    pub fn for_operation(op: Operation) -> Self {
        match op {
            Operation::Read => Self::DegradeOnReadError,
            Operation::Write => Self::FailOnWriteError,
        }
    }

    pub fn apply<T: Default>(self, op: Operation, result: anyhow::Result<T>) -> Result<T, RecallError> {
        let e = match result {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        match self {
            Self::DegradeOnReadError => {
                warn!(operation = ?op, error = ?e, "Document store call failed, continuing without results");
                Ok(T::default())
            }
            Self::FailOnWriteError => {
                error!(operation = ?op, error = ?e, "Document store call failed");
                let message = format!("{e:#}");
                Err(match op {
                    Operation::Read => RecallError::Retrieval(message),
                    Operation::Write => RecallError::Storage(message),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn defaults_follow_the_operation() {
        assert_eq!(ErrorPolicy::for_operation(Operation::Read), ErrorPolicy::DegradeOnReadError);
        assert_eq!(ErrorPolicy::for_operation(Operation::Write), ErrorPolicy::FailOnWriteError);
    }

    #[test]
    fn degrade_swallows_errors() {
        let out: Option<String> = ErrorPolicy::DegradeOnReadError
            .apply(Operation::Read, Err(anyhow!("connection refused")))
            .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn fail_keeps_the_whole_chain() {
        let failed: anyhow::Result<Vec<String>> =
            Err(anyhow!("disk full")).context("Failed to add documents");
        let err = ErrorPolicy::FailOnWriteError.apply(Operation::Write, failed).unwrap_err();
        match err {
            RecallError::Storage(msg) => assert_eq!(msg, "Failed to add documents: disk full"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ok_passes_through() {
        let out = ErrorPolicy::FailOnWriteError.apply(Operation::Write, Ok(3usize)).unwrap();
        assert_eq!(out, 3);
    }
}
