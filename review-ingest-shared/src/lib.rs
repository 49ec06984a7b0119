//! # Review Ingest Shared
//!
//! Shared types and path helpers for the review ingestion service.
//!
//! Everything here is plain data: the job description consumed by the
//! orchestrator, the candidate and notification types flowing between
//! components, and the deterministic blob-path construction for one run.

pub mod job;
pub mod notification;
pub mod paths;
pub mod place;
pub mod sort;

pub use job::JobRequest;
pub use notification::{NotificationPayload, NOTIFICATION_SOURCE};
pub use paths::{metadata_path, review_chunk_path, search_results_path, slugify, RunKey};
pub use place::{PlaceCandidate, Review};
pub use sort::ReviewSort;
