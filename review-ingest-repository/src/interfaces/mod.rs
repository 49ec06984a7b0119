//! Interface definitions for the ingestion collaborators.
//!
//! This module defines the abstract traits the orchestrator is constructed
//! over, allowing for dependency injection and swappable backend
//! implementations.

mod blob_store;
mod notification_publisher;
mod search_api_client;

pub use blob_store::BlobStore;
pub use notification_publisher::NotificationPublisher;
pub use search_api_client::SearchApiClient;
