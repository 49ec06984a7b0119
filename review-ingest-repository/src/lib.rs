//! # Review Ingest Repository
//!
//! Trait interfaces for the ingestion service's external collaborators and
//! the concrete implementations behind them: the SerpApi search client,
//! object-store blob storage, and the Kafka notification publisher.
//!
//! The orchestrator depends only on the traits in [`interfaces`], so every
//! backend can be swapped for a mock in tests.

pub mod blob;
pub mod errors;
pub mod interfaces;
pub mod queue;
pub mod serpapi;

pub use blob::BlobStorage;
pub use errors::{BlobError, PublishError, SearchApiError};
pub use interfaces::{BlobStore, NotificationPublisher, SearchApiClient};
pub use queue::KafkaPublisher;
pub use serpapi::SerpApiClient;
