//! Error types for the review ingest repository.

mod blob_error;
mod publish_error;
mod search_api_error;

pub use blob_error::BlobError;
pub use publish_error::PublishError;
pub use search_api_error::SearchApiError;
