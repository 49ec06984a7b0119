//! Configuration and dependency wiring for the ingestion service.

mod dependencies;

pub use dependencies::Dependencies;
