//! # Review Ingest
//!
//! Main library for the place review ingestion service.
//!
//! This crate provides the entry point and configuration for running one
//! ingestion job against the configured backends.

pub mod config;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum IngestionError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] review_ingest_pipeline::PipelineError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IngestionError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
