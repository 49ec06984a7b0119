//! Blob store trait definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::BlobError;

/// Durable key/value blob writer keyed by path.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` at `path`, overwriting any existing blob.
    ///
    /// Writes are atomic from a reader's perspective: no partially written
    /// blob is ever visible at `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The path written, echoed back
    /// * `Err(BlobError)` - If the write fails
    async fn put(&self, path: &str, data: Bytes) -> Result<String, BlobError>;
}
