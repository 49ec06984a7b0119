//! # Review Ingest Pipeline
//!
//! This crate drives one ingestion run end-to-end: search for place
//! candidates, persist the search results, then for each candidate fetch
//! paginated reviews, persist metadata and review chunks, and publish a
//! completion notification.
//!
//! ## Architecture
//!
//! The orchestrator is constructed over the repository's collaborator
//! traits, so every backend (search provider, blob store, queue publisher)
//! can be swapped for a mock. Processing is strictly sequential: one search
//! call, then places one at a time in rank order.

pub mod errors;
pub mod orchestrator;

pub use errors::PipelineError;
pub use orchestrator::{
    IngestionOrchestrator, OrchestratorConfig, PlaceErrorPolicy, RunReport,
};
