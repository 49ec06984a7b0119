//! Job request type consumed by the ingestion orchestrator.

use serde::Deserialize;

/// Default number of place candidates taken from a search.
const DEFAULT_LIMIT: usize = 10;

/// Default maximum number of reviews fetched per place.
const DEFAULT_MAX_REVIEWS: usize = 40;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_max_reviews() -> usize {
    DEFAULT_MAX_REVIEWS
}

/// Description of one ingestion run.
///
/// Deserialized from the inbound JSON job document. Only `query` is
/// required; the numeric fields fall back to their defaults and `location`
/// is an optional `"lat,lon"` bias passed through to the search provider
/// (`ll` is accepted as an alias, matching the provider parameter name).
///
/// A job is created per invocation and discarded after the run; no state
/// persists between runs.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRequest {
    /// Free-text place search query.
    pub query: String,
    /// Number of candidates to take from the search results.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Cap on reviews accumulated per place across pages.
    #[serde(default = "default_max_reviews")]
    pub max_reviews: usize,
    /// Optional `"latitude,longitude"` location bias.
    #[serde(default, alias = "ll")]
    pub location: Option<String>,
}

impl JobRequest {
    /// Create a job for the given query with default limits.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_LIMIT,
            max_reviews: DEFAULT_MAX_REVIEWS,
            location: None,
        }
    }

    /// Set the candidate limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the per-place review cap.
    pub fn with_max_reviews(mut self, max_reviews: usize) -> Self {
        self.max_reviews = max_reviews;
        self
    }

    /// Set the location bias.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
