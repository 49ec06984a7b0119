//! Dependency initialization and wiring for the ingestion service.

use std::env;
use std::sync::Arc;

use tracing::info;

use crate::IngestionError;
use review_ingest_pipeline::{IngestionOrchestrator, OrchestratorConfig, PlaceErrorPolicy};
use review_ingest_repository::{BlobStorage, KafkaPublisher, SerpApiClient};

/// Default language code sent with every provider request.
const DEFAULT_HL: &str = "en";

/// Default country code sent with every provider request.
const DEFAULT_GL: &str = "ca";

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Default topic completion notifications are published to.
const DEFAULT_KAFKA_TOPIC: &str = "place.process";

/// Default base directory for the local blob backend.
const DEFAULT_BLOB_LOCAL_DIR: &str = "./data";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: IngestionOrchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SERPAPI_KEY`: SerpApi API key (required)
    /// - `SERPAPI_HL`: language code (default: en)
    /// - `SERPAPI_GL`: country code (default: ca)
    /// - `KAFKA_BROKER`: broker address (default: localhost:9092)
    /// - `KAFKA_TOPIC`: notification topic (default: place.process)
    /// - `BLOB_BACKEND`: `azure`, `local`, or `memory` (default: local)
    /// - `BLOB_LOCAL_DIR`: base directory for the local backend (default: ./data)
    /// - `AZURE_STORAGE_ACCOUNT`, `BLOB_CONTAINER`: azure backend settings
    /// - `PLACE_ERROR_POLICY`: `continue` or `abort` (default: continue)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IngestionError)` - If required configuration is missing or a
    ///   client cannot be constructed
    pub fn new() -> Result<Self, IngestionError> {
        let api_key = env::var("SERPAPI_KEY")
            .map_err(|_| IngestionError::config("Missing SERPAPI_KEY environment variable"))?;
        let hl = env::var("SERPAPI_HL").unwrap_or_else(|_| DEFAULT_HL.to_string());
        let gl = env::var("SERPAPI_GL").unwrap_or_else(|_| DEFAULT_GL.to_string());
        let kafka_broker =
            env::var("KAFKA_BROKER").unwrap_or_else(|_| DEFAULT_KAFKA_BROKER.to_string());
        let kafka_topic =
            env::var("KAFKA_TOPIC").unwrap_or_else(|_| DEFAULT_KAFKA_TOPIC.to_string());

        info!(
            kafka_broker = %kafka_broker,
            kafka_topic = %kafka_topic,
            hl = %hl,
            gl = %gl,
            "Initializing dependencies"
        );

        let search = SerpApiClient::new(api_key, hl, gl)
            .map_err(|e| IngestionError::config(format!("Failed to create search client: {}", e)))?;

        let blobs = build_blob_storage()?;

        // Publisher construction failure aborts before any work starts.
        let publisher = KafkaPublisher::new(&kafka_broker, &kafka_topic).map_err(|e| {
            IngestionError::config(format!("Failed to create Kafka publisher: {}", e))
        })?;

        let config = OrchestratorConfig {
            place_error_policy: place_error_policy()?,
            ..OrchestratorConfig::default()
        };

        let orchestrator = IngestionOrchestrator::with_config(
            Arc::new(search),
            Arc::new(blobs),
            Arc::new(publisher),
            config,
        );

        Ok(Self { orchestrator })
    }
}

/// Build the blob backend selected by `BLOB_BACKEND`.
fn build_blob_storage() -> Result<BlobStorage, IngestionError> {
    let backend = env::var("BLOB_BACKEND").unwrap_or_else(|_| "local".to_string());

    match backend.as_str() {
        "memory" => Ok(BlobStorage::memory()),
        "local" => {
            let base_dir =
                env::var("BLOB_LOCAL_DIR").unwrap_or_else(|_| DEFAULT_BLOB_LOCAL_DIR.to_string());
            std::fs::create_dir_all(&base_dir)?;
            BlobStorage::local(&base_dir)
                .map_err(|e| IngestionError::config(format!("Failed to create blob storage: {}", e)))
        }
        "azure" => {
            let account = env::var("AZURE_STORAGE_ACCOUNT").map_err(|_| {
                IngestionError::config("Missing AZURE_STORAGE_ACCOUNT environment variable")
            })?;
            let container = env::var("BLOB_CONTAINER")
                .map_err(|_| IngestionError::config("Missing BLOB_CONTAINER environment variable"))?;
            BlobStorage::azure(&account, &container)
                .map_err(|e| IngestionError::config(format!("Failed to create blob storage: {}", e)))
        }
        other => Err(IngestionError::config(format!(
            "Unknown BLOB_BACKEND: {}",
            other
        ))),
    }
}

/// Parse `PLACE_ERROR_POLICY`, defaulting to continue-on-place-error.
fn place_error_policy() -> Result<PlaceErrorPolicy, IngestionError> {
    match env::var("PLACE_ERROR_POLICY").as_deref() {
        Err(_) | Ok("continue") => Ok(PlaceErrorPolicy::ContinueOnPlaceError),
        Ok("abort") => Ok(PlaceErrorPolicy::AbortOnPlaceError),
        Ok(other) => Err(IngestionError::config(format!(
            "Unknown PLACE_ERROR_POLICY: {}",
            other
        ))),
    }
}
