//! SerpApi client implementation.
//!
//! This module provides the concrete [`SearchApiClient`] implementation for
//! the SerpApi Google Maps engines.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_retry::RetryIf;
use tracing::{debug, instrument, warn};

use crate::errors::SearchApiError;
use crate::interfaces::SearchApiClient;
use crate::serpapi::retry::RetryPolicy;
use crate::serpapi::transport::{HttpTransport, SerpTransport};
use review_ingest_shared::{PlaceCandidate, Review, ReviewSort};

/// Client for the SerpApi Google Maps engines.
///
/// Holds the API key plus the language (`hl`) and country (`gl`) parameters
/// sent with every request. All outbound calls go through a shared
/// bounded-backoff retry wrapper; errors reaching the caller mean retries
/// were exhausted or the fault was terminal.
pub struct SerpApiClient {
    transport: Arc<dyn SerpTransport>,
    api_key: String,
    hl: String,
    gl: String,
    retry: RetryPolicy,
}

impl SerpApiClient {
    /// Create a client against the real endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - SerpApi API key
    /// * `hl` - Language code (e.g. "en")
    /// * `gl` - Country code (e.g. "ca")
    pub fn new(
        api_key: impl Into<String>,
        hl: impl Into<String>,
        gl: impl Into<String>,
    ) -> Result<Self, SearchApiError> {
        let transport = Arc::new(HttpTransport::new()?);
        Ok(Self::with_transport(transport, api_key, hl, gl))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(
        transport: Arc<dyn SerpTransport>,
        api_key: impl Into<String>,
        hl: impl Into<String>,
        gl: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            hl: hl.into(),
            gl: gl.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Issue one provider call with the API key attached and the retry
    /// wrapper applied.
    async fn call(&self, mut params: Vec<(String, String)>) -> Result<Value, SearchApiError> {
        params.push(("api_key".to_string(), self.api_key.clone()));

        RetryIf::spawn(
            self.retry.delays(),
            || self.attempt(&params),
            SearchApiError::is_retryable,
        )
        .await
    }

    /// One transport attempt, logging the failure when it occurs.
    async fn attempt(&self, params: &[(String, String)]) -> Result<Value, SearchApiError> {
        match self.transport.get_json(params).await {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!(error = %e, "Search API request failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SearchApiClient for SerpApiClient {
    #[instrument(skip(self))]
    async fn search_places(
        &self,
        query: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, SearchApiError> {
        let mut params = vec![
            ("engine".to_string(), "google_maps".to_string()),
            ("q".to_string(), query.to_string()),
            ("hl".to_string(), self.hl.clone()),
            ("gl".to_string(), self.gl.clone()),
        ];
        if let Some(ll) = location {
            params.push(("ll".to_string(), ll.to_string()));
        }

        let body = self.call(params).await?;
        let candidates = extract_candidates(&body, limit);

        debug!(count = candidates.len(), "Search returned candidates");
        Ok(candidates)
    }

    #[instrument(skip(self))]
    async fn fetch_reviews(
        &self,
        place_id: &str,
        max_reviews: usize,
        sort: ReviewSort,
    ) -> Result<Vec<Review>, SearchApiError> {
        let mut collected: Vec<Review> = Vec::new();
        let mut page_token: Option<String> = None;

        while collected.len() < max_reviews {
            let mut params = vec![
                ("engine".to_string(), "google_maps_reviews".to_string()),
                ("place_id".to_string(), place_id.to_string()),
                ("hl".to_string(), self.hl.clone()),
                ("gl".to_string(), self.gl.clone()),
                ("sort_by".to_string(), sort.as_str().to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("next_page_token".to_string(), token.clone()));
            }

            let body = self.call(params).await?;

            let page = body
                .get("reviews")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let page_len = page.len();
            collected.extend(page);

            page_token = body
                .get("next_page_token")
                .and_then(Value::as_str)
                .map(str::to_string);

            debug!(page_len = page_len, total = collected.len(), "Fetched review page");

            if page_token.is_none() || page_len == 0 {
                break;
            }
        }

        collected.truncate(max_reviews);
        Ok(collected)
    }
}

/// Take the first `limit` entries of the primary result list, falling back
/// to the alternate field when the primary is absent or empty.
///
/// The alternate field carries a single object for single-place responses;
/// that object is treated as one candidate.
fn extract_candidates(body: &Value, limit: usize) -> Vec<PlaceCandidate> {
    let results: Vec<Value> = match body.get("local_results").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list.clone(),
        _ => match body.get("place_results") {
            Some(Value::Array(list)) => list.clone(),
            Some(single @ Value::Object(_)) => vec![single.clone()],
            _ => Vec::new(),
        },
    };

    results
        .into_iter()
        .take(limit)
        .map(PlaceCandidate::from_result)
        .collect()
}
