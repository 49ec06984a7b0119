//! Error types for the review ingest pipeline.

use thiserror::Error;

use review_ingest_repository::{BlobError, PublishError, SearchApiError};

/// Errors that can occur during an ingestion run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The job description failed validation.
    #[error("Invalid job: {0}")]
    InvalidJob(String),

    /// Error from the search provider.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchApiError),

    /// Error writing to the object store.
    #[error("Blob error: {0}")]
    BlobError(#[from] BlobError),

    /// Error emitting a notification.
    #[error("Publish error: {0}")]
    PublishError(#[from] PublishError),

    /// Error serializing a blob or payload body.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Processing one place failed while the abort policy was active.
    #[error("Place {place_id} failed: {source}")]
    PlaceError {
        /// Identifier of the failed place.
        place_id: String,
        /// The underlying failure.
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Create an invalid job error.
    pub fn invalid_job(msg: impl Into<String>) -> Self {
        Self::InvalidJob(msg.into())
    }

    /// Wrap a failure in the place it occurred in.
    pub fn place(place_id: impl Into<String>, source: PipelineError) -> Self {
        Self::PlaceError {
            place_id: place_id.into(),
            source: Box::new(source),
        }
    }
}
