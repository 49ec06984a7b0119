//! Notification publish error types.

use thiserror::Error;

/// Errors that can occur emitting notifications to the queue.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The producer could not be constructed.
    #[error("Build error: {0}")]
    BuildError(String),

    /// A message send failed or timed out.
    #[error("Send error: {0}")]
    SendError(String),

    /// The payload could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Releasing the producer failed.
    #[error("Close error: {0}")]
    CloseError(String),
}

impl PublishError {
    /// Create a build error.
    pub fn build(msg: impl Into<String>) -> Self {
        Self::BuildError(msg.into())
    }

    /// Create a send error.
    pub fn send(msg: impl Into<String>) -> Self {
        Self::SendError(msg.into())
    }

    /// Create a close error.
    pub fn close(msg: impl Into<String>) -> Self {
        Self::CloseError(msg.into())
    }
}
