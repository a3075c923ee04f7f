//! Error types for the Ripple client.
//!
//! Propagation policy: configuration and scope errors fail fast at setup
//! time; feed errors are captured into the view's error cell and never
//! thrown, so a long-lived subscription survives transient failures; write
//! errors are local to the mutation call that caused them.

use ripple_engine::DocumentKey;
use thiserror::Error;

pub use crate::config::ConfigError;

/// A collection was opened without a live disposal scope.
#[derive(Debug, Clone, Error)]
#[error("no active scope: {0}")]
pub struct ContextError(pub String);

/// Failure delivered out-of-band by an open change feed.
///
/// Recoverable: the feed may keep delivering batches afterwards, and a
/// successful batch clears the published error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("feed transport failure: {0}")]
    Transport(String),

    #[error("feed permission denied: {0}")]
    PermissionDenied(String),
}

/// A mutation call against the store failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The targeted document does not exist (store not-found semantics)
    #[error("document not found: {0}")]
    NotFound(DocumentKey),

    #[error("write permission denied: {0}")]
    PermissionDenied(String),

    #[error("write transport failure: {0}")]
    Transport(String),
}

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WriteError::NotFound("doc-1".into());
        assert_eq!(err.to_string(), "document not found: doc-1");

        let err = FeedError::Transport("connection reset".into());
        assert_eq!(err.to_string(), "feed transport failure: connection reset");

        let err = ContextError("scope already disposed".into());
        assert_eq!(err.to_string(), "no active scope: scope already disposed");
    }

    #[test]
    fn umbrella_preserves_source_message() {
        let err: Error = ConfigError::MissingProjectId.into();
        assert_eq!(err.to_string(), "store project id is required");
    }
}
