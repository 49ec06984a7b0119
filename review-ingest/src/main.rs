//! CLI entry point for the place review ingestion service.
//!
//! Reads one JSON job description from the first argument (or the
//! `INGEST_JOB` environment variable), wires the backends from the
//! environment, and runs the job to completion.

use std::env;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use review_ingest::{Dependencies, IngestionError};
use review_ingest_shared::JobRequest;

#[tokio::main]
async fn main() -> Result<(), IngestionError> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let job = read_job()?;
    info!(
        query = %job.query,
        limit = job.limit,
        max_reviews = job.max_reviews,
        "Loaded job"
    );

    let deps = Dependencies::new()?;
    let report = deps.orchestrator.run(&job).await?;

    info!(
        candidates = report.candidates,
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        blobs_written = report.blobs_written,
        notifications_sent = report.notifications_sent,
        "Job finished"
    );

    Ok(())
}

/// The job document comes from the first CLI argument, falling back to the
/// `INGEST_JOB` environment variable.
fn read_job() -> Result<JobRequest, IngestionError> {
    let raw = env::args()
        .nth(1)
        .or_else(|| env::var("INGEST_JOB").ok())
        .ok_or_else(|| {
            IngestionError::config("No job given: pass a JSON document or set INGEST_JOB")
        })?;

    serde_json::from_str(&raw)
        .map_err(|e| IngestionError::config(format!("Invalid job document: {}", e)))
}
