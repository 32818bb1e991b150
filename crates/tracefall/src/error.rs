//! Error types for entry linking and transport.

use crate::types::ThreadId;
use thiserror::Error;

/// Errors that can occur while linking or transporting entries.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The parent (or the entry spawning a child) has already closed its thread.
    #[error("the parent must not be a finished thread point")]
    ParentAlreadyFinished,

    /// The parent belongs to a different thread than the child.
    #[error("parent thread {found} differs from the entry thread {expected}")]
    ParentThreadMismatch {
        /// Thread of the entry being linked.
        expected: ThreadId,
        /// Thread of the rejected parent.
        found: ThreadId,
    },

    /// An environment name was not one of `dev`, `prod` or `test`.
    #[error("unknown environment: {0}")]
    InvalidEnvironment(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for entry operations.
pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn error_display_messages() {
        let err = TraceError::ParentAlreadyFinished;
        assert_eq!(err.to_string(), "the parent must not be a finished thread point");

        let err = TraceError::InvalidEnvironment("staging".to_string());
        assert_eq!(err.to_string(), "unknown environment: staging");
    }

    #[test]
    fn thread_mismatch_names_both_threads() {
        let expected = ThreadId(Uuid::new_v4());
        let found = ThreadId(Uuid::new_v4());
        let err = TraceError::ParentThreadMismatch { expected, found };

        let msg = err.to_string();
        assert!(msg.contains(&expected.to_string()));
        assert!(msg.contains(&found.to_string()));
    }

    #[test]
    fn serde_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json")
            .map_err(TraceError::from)
            .err();
        assert!(err.is_some_and(|e| e.to_string().starts_with("serialization error")));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TraceError>();
    }

    #[test]
    fn result_type_err() {
        let result: Result<()> = Err(TraceError::ParentAlreadyFinished);
        assert!(matches!(result, Err(TraceError::ParentAlreadyFinished)));
    }
}
