//! Blob storage implementation.
//!
//! Wraps an `object_store` backend behind the [`BlobStore`] interface.
//! Overwrite semantics and write atomicity come from the object store
//! contract: a put replaces the blob at the path, and readers never observe
//! a partial write.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjPath;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, info};

use crate::errors::BlobError;
use crate::interfaces::BlobStore;

/// Blob writer over any `object_store` backend.
#[derive(Clone)]
pub struct BlobStorage {
    store: Arc<dyn ObjectStore>,
}

impl BlobStorage {
    /// Wrap an existing backend.
    pub fn with_backend(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// In-memory backend; contents live for the lifetime of the value.
    pub fn memory() -> Self {
        Self::with_backend(Arc::new(InMemory::new()))
    }

    /// Local filesystem backend rooted at `base_dir`.
    ///
    /// The directory must already exist.
    pub fn local(base_dir: &str) -> Result<Self, BlobError> {
        let store = LocalFileSystem::new_with_prefix(base_dir)
            .map_err(|e| BlobError::build(e.to_string()))?;

        Ok(Self::with_backend(Arc::new(store)))
    }

    /// Azure Blob Storage backend for the given account and container.
    ///
    /// Credentials are resolved from the environment by the builder.
    pub fn azure(account: &str, container: &str) -> Result<Self, BlobError> {
        let store = MicrosoftAzureBuilder::from_env()
            .with_account(account)
            .with_container_name(container)
            .build()
            .map_err(|e| BlobError::build(e.to_string()))?;

        info!(account = %account, container = %container, "Created Azure blob backend");

        Ok(Self::with_backend(Arc::new(store)))
    }

    /// Read a blob back, buffered in memory.
    pub async fn get(&self, path: &str) -> Result<Bytes, BlobError> {
        let location = ObjPath::from(path);
        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| BlobError::get(path, e.to_string()))?;

        result
            .bytes()
            .await
            .map_err(|e| BlobError::get(path, e.to_string()))
    }
}

#[async_trait]
impl BlobStore for BlobStorage {
    async fn put(&self, path: &str, data: Bytes) -> Result<String, BlobError> {
        let location = ObjPath::from(path);
        let payload = PutPayload::from(data);

        self.store
            .put(&location, payload)
            .await
            .map_err(|e| BlobError::put(path, e.to_string()))?;

        debug!(path = %path, "Wrote blob");
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_echoes_the_path_and_persists() {
        let storage = BlobStorage::memory();

        let written = storage
            .put("raw/p1/2026-08-07-120000/metadata.json", Bytes::from_static(b"{}"))
            .await
            .unwrap();

        assert_eq!(written, "raw/p1/2026-08-07-120000/metadata.json");
        assert_eq!(storage.get(&written).await.unwrap(), Bytes::from_static(b"{}"));
    }

    #[tokio::test]
    async fn test_put_overwrites_at_the_same_path() {
        let storage = BlobStorage::memory();
        let path = "search/coffee/2026-08-07-120000/search_results.json";

        storage.put(path, Bytes::from_static(b"first")).await.unwrap();
        storage.put(path, Bytes::from_static(b"second")).await.unwrap();

        assert_eq!(storage.get(path).await.unwrap(), Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn test_get_missing_blob_is_an_error() {
        let storage = BlobStorage::memory();

        let err = storage.get("raw/missing/metadata.json").await.unwrap_err();
        assert!(matches!(err, BlobError::GetError { .. }));
    }
}
