//! Search API client trait definition.
//!
//! This module defines the abstract interface for the outbound place-search
//! provider, allowing for different implementations (SerpApi, mock, etc.).

use async_trait::async_trait;

use crate::errors::SearchApiError;
use review_ingest_shared::{PlaceCandidate, Review, ReviewSort};

/// Abstract interface for the outbound search provider.
///
/// Implementations can be swapped for mocks in orchestrator tests.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchApiError>`; transient faults are
/// retried inside the implementation, so an error reaching the caller means
/// retries were exhausted or the fault was terminal.
#[async_trait]
pub trait SearchApiClient: Send + Sync {
    /// Search for place candidates matching a query.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text place search query
    /// * `location` - Optional `"lat,lon"` bias passed through to the provider
    /// * `limit` - Maximum number of candidates to return
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PlaceCandidate>)` - Candidates in provider ranking order.
    ///   An empty vector is a valid, non-error result.
    /// * `Err(SearchApiError)` - If the request fails
    async fn search_places(
        &self,
        query: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, SearchApiError>;

    /// Fetch up to `max_reviews` reviews for a place.
    ///
    /// Paginates with the provider's continuation token, carrying the
    /// previous page's token on each subsequent request. Accumulation stops
    /// when the cap is reached, the provider returns no token, or a page
    /// yields zero reviews, whichever happens first; the result is
    /// truncated to exactly `max_reviews`.
    ///
    /// # Arguments
    ///
    /// * `place_id` - Provider-issued place identifier
    /// * `max_reviews` - Cap on accumulated reviews; `0` issues no request
    /// * `sort` - Provider-side review ordering
    async fn fetch_reviews(
        &self,
        place_id: &str,
        max_reviews: usize,
        sort: ReviewSort,
    ) -> Result<Vec<Review>, SearchApiError>;
}
