//! Blob storage error types.

use thiserror::Error;

/// Errors that can occur writing to the object store.
#[derive(Error, Debug)]
pub enum BlobError {
    /// A blob write failed.
    #[error("Put error at {path}: {message}")]
    PutError {
        /// Path of the failed write.
        path: String,
        /// Backend error description.
        message: String,
    },

    /// A blob read failed.
    #[error("Get error at {path}: {message}")]
    GetError {
        /// Path of the failed read.
        path: String,
        /// Backend error description.
        message: String,
    },

    /// The storage backend could not be constructed.
    #[error("Build error: {0}")]
    BuildError(String),
}

impl BlobError {
    /// Create a put error.
    pub fn put(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PutError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a get error.
    pub fn get(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GetError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a build error.
    pub fn build(msg: impl Into<String>) -> Self {
        Self::BuildError(msg.into())
    }
}
