//! Orchestrator module for the review ingest pipeline.
//!
//! Coordinates one run: search, search-result persistence, per-place review
//! pagination and chunked persistence, and notification publishing.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use review_ingest_repository::{BlobStore, NotificationPublisher, SearchApiClient};
use review_ingest_shared::{
    metadata_path, review_chunk_path, search_results_path, JobRequest, NotificationPayload,
    PlaceCandidate, ReviewSort, RunKey, NOTIFICATION_SOURCE,
};

/// Number of reviews persisted per chunk blob.
const CHUNK_SIZE: usize = 200;

/// What a failure inside one place's processing does to the rest of the run.
///
/// Publish failures are exempt either way: they are always caught and
/// logged, and never abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceErrorPolicy {
    /// Log the failure and continue with the next place.
    #[default]
    ContinueOnPlaceError,
    /// Fail the whole run on the first place failure.
    AbortOnPlaceError,
}

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Reviews per chunk blob. Must be non-zero.
    pub chunk_size: usize,
    /// Failure scope for per-place errors.
    pub place_error_policy: PlaceErrorPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            place_error_policy: PlaceErrorPolicy::default(),
        }
    }
}

/// Aggregate outcome of one run.
///
/// The run's real product is its side effects; this is the summary the
/// caller logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Candidates returned by the search.
    pub candidates: usize,
    /// Places fully processed (blobs written, notification attempted).
    pub processed: usize,
    /// Candidates skipped for lack of a place_id.
    pub skipped: usize,
    /// Places whose processing failed.
    pub failed: usize,
    /// Blobs written across the run, including the search results blob.
    pub blobs_written: usize,
    /// Notifications acknowledged by the queue.
    pub notifications_sent: usize,
}

/// Orchestrator that drives one ingestion run.
///
/// The orchestrator:
/// - Validates the job and performs the candidate search
/// - Persists search results, place metadata, and review chunks
/// - Publishes one completion notification per processed place
/// - Releases the messaging producer exactly once at run end
///
/// Processing is strictly sequential in search rank order; blob paths are
/// collision-free by construction, so a re-run pinned to the same
/// [`RunKey`] overwrites its predecessor's blobs.
pub struct IngestionOrchestrator {
    search: Arc<dyn SearchApiClient>,
    blobs: Arc<dyn BlobStore>,
    publisher: Arc<dyn NotificationPublisher>,
    config: OrchestratorConfig,
}

impl IngestionOrchestrator {
    /// Create a new orchestrator with the given collaborators.
    pub fn new(
        search: Arc<dyn SearchApiClient>,
        blobs: Arc<dyn BlobStore>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self::with_config(search, blobs, publisher, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        search: Arc<dyn SearchApiClient>,
        blobs: Arc<dyn BlobStore>,
        publisher: Arc<dyn NotificationPublisher>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            search,
            blobs,
            publisher,
            config,
        }
    }

    /// Run one ingestion job under a fresh run key.
    ///
    /// Validation and search failures are run-fatal; per-place failures are
    /// handled per the configured [`PlaceErrorPolicy`].
    pub async fn run(&self, job: &JobRequest) -> Result<RunReport, PipelineError> {
        self.run_with_key(job, RunKey::now()).await
    }

    /// Run one ingestion job under an explicit run key.
    ///
    /// Re-running with a previous key overwrites that run's blobs at the
    /// same paths instead of duplicating them.
    #[instrument(skip(self, job), fields(query = %job.query, run_key = %run_key))]
    pub async fn run_with_key(
        &self,
        job: &JobRequest,
        run_key: RunKey,
    ) -> Result<RunReport, PipelineError> {
        if job.query.trim().is_empty() {
            return Err(PipelineError::invalid_job("query is required"));
        }

        info!("Starting ingestion run");

        let candidates = self
            .search
            .search_places(&job.query, job.location.as_deref(), job.limit)
            .await?;

        let search_body = serde_json::to_vec(&json!({
            "query": &job.query,
            "results": &candidates,
        }))?;
        self.blobs
            .put(
                &search_results_path(&job.query, &run_key),
                Bytes::from(search_body),
            )
            .await?;

        info!(candidates = candidates.len(), "Wrote search results");

        let mut report = RunReport {
            candidates: candidates.len(),
            blobs_written: 1,
            ..RunReport::default()
        };

        // The messaging scope opens here; whatever the place loop does, the
        // producer is released exactly once before the run returns.
        let outcome = self
            .process_places(job, &candidates, &run_key, &mut report)
            .await;

        if let Err(e) = self.publisher.close().await {
            warn!(error = %e, "Failed to close notification publisher");
        }

        outcome?;

        info!(
            processed = report.processed,
            skipped = report.skipped,
            failed = report.failed,
            blobs_written = report.blobs_written,
            notifications_sent = report.notifications_sent,
            "Ingestion run complete"
        );

        Ok(report)
    }

    /// Process every candidate in search rank order.
    async fn process_places(
        &self,
        job: &JobRequest,
        candidates: &[PlaceCandidate],
        run_key: &RunKey,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        let total = candidates.len();

        for (idx, candidate) in candidates.iter().enumerate() {
            let rank = idx + 1;

            let Some(place_id) = candidate.place_id.as_deref() else {
                info!(rank = rank, "Skipping candidate without place_id");
                report.skipped += 1;
                continue;
            };

            info!(rank = rank, total = total, place_id = %place_id, "Processing place");

            match self
                .process_place(job, candidate, place_id, rank, run_key, report)
                .await
            {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    report.failed += 1;
                    match self.config.place_error_policy {
                        PlaceErrorPolicy::ContinueOnPlaceError => {
                            error!(place_id = %place_id, error = %e, "Place failed; continuing");
                        }
                        PlaceErrorPolicy::AbortOnPlaceError => {
                            return Err(PipelineError::place(place_id, e));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Persist one place's metadata and review chunks, then publish its
    /// completion notification.
    ///
    /// Publish failures are caught here: the notification is lost but the
    /// place still counts as processed, since its blobs are durable.
    async fn process_place(
        &self,
        job: &JobRequest,
        candidate: &PlaceCandidate,
        place_id: &str,
        rank: usize,
        run_key: &RunKey,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        let meta_body = serde_json::to_vec(candidate)?;
        let meta_path = self
            .blobs
            .put(&metadata_path(place_id, run_key), Bytes::from(meta_body))
            .await?;
        report.blobs_written += 1;

        let mut blob_paths = vec![meta_path];

        let reviews = self
            .search
            .fetch_reviews(place_id, job.max_reviews, ReviewSort::default())
            .await?;
        debug!(place_id = %place_id, count = reviews.len(), "Fetched reviews");

        for (i, chunk) in reviews.chunks(self.config.chunk_size).enumerate() {
            let chunk_body = serde_json::to_vec(chunk)?;
            let path = self
                .blobs
                .put(
                    &review_chunk_path(place_id, run_key, i + 1),
                    Bytes::from(chunk_body),
                )
                .await?;
            blob_paths.push(path);
            report.blobs_written += 1;
        }

        info!(
            place_id = %place_id,
            reviews = reviews.len(),
            blobs = blob_paths.len(),
            "Wrote place blobs"
        );

        let payload = NotificationPayload {
            place_id: place_id.to_string(),
            place_name: candidate.name().map(str::to_string),
            blob_paths,
            fetch_ts: Utc::now().timestamp(),
            review_count: reviews.len(),
            source: NOTIFICATION_SOURCE.to_string(),
            query: job.query.clone(),
            rank,
        };

        match self.publisher.publish(&payload).await {
            Ok(()) => {
                report.notifications_sent += 1;
                info!(place_id = %place_id, "Published notification");
            }
            Err(e) => {
                error!(place_id = %place_id, error = %e, "Failed to publish notification");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use review_ingest_repository::{BlobError, PublishError, SearchApiError};
    use review_ingest_shared::Review;

    /// Search client returning a scripted candidate list and per-place
    /// review sets.
    struct MockSearch {
        candidates: Vec<PlaceCandidate>,
        reviews: HashMap<String, Vec<Review>>,
        fail_search: bool,
        fail_reviews_for: Option<String>,
        search_calls: AtomicUsize,
    }

    impl MockSearch {
        fn new(candidates: Vec<PlaceCandidate>) -> Self {
            Self {
                candidates,
                reviews: HashMap::new(),
                fail_search: false,
                fail_reviews_for: None,
                search_calls: AtomicUsize::new(0),
            }
        }

        fn with_reviews(mut self, place_id: &str, reviews: Vec<Review>) -> Self {
            self.reviews.insert(place_id.to_string(), reviews);
            self
        }

        fn failing_search(mut self) -> Self {
            self.fail_search = true;
            self
        }

        fn failing_reviews_for(mut self, place_id: &str) -> Self {
            self.fail_reviews_for = Some(place_id.to_string());
            self
        }
    }

    #[async_trait]
    impl SearchApiClient for MockSearch {
        async fn search_places(
            &self,
            _query: &str,
            _location: Option<&str>,
            limit: usize,
        ) -> Result<Vec<PlaceCandidate>, SearchApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_search {
                return Err(SearchApiError::transport("search down"));
            }
            Ok(self.candidates.iter().take(limit).cloned().collect())
        }

        async fn fetch_reviews(
            &self,
            place_id: &str,
            max_reviews: usize,
            _sort: ReviewSort,
        ) -> Result<Vec<Review>, SearchApiError> {
            if self.fail_reviews_for.as_deref() == Some(place_id) {
                return Err(SearchApiError::status(503, "unavailable"));
            }
            let mut reviews = self.reviews.get(place_id).cloned().unwrap_or_default();
            reviews.truncate(max_reviews);
            Ok(reviews)
        }
    }

    /// Blob store capturing every write in order.
    #[derive(Default)]
    struct MockBlobs {
        writes: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl MockBlobs {
        fn paths(&self) -> Vec<String> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .map(|(p, _)| p.clone())
                .collect()
        }

        fn body_of(&self, path: &str) -> Value {
            let writes = self.writes.lock().unwrap();
            let (_, body) = writes
                .iter()
                .rev()
                .find(|(p, _)| p == path)
                .expect("path never written");
            serde_json::from_slice(body).unwrap()
        }
    }

    #[async_trait]
    impl BlobStore for MockBlobs {
        async fn put(&self, path: &str, data: Bytes) -> Result<String, BlobError> {
            self.writes
                .lock()
                .unwrap()
                .push((path.to_string(), data.to_vec()));
            Ok(path.to_string())
        }
    }

    /// Publisher capturing payloads, optionally failing every send.
    #[derive(Default)]
    struct MockPublisher {
        published: Mutex<Vec<NotificationPayload>>,
        fail_publish: bool,
        closed: AtomicUsize,
    }

    impl MockPublisher {
        fn failing() -> Self {
            Self {
                fail_publish: true,
                ..Self::default()
            }
        }

        fn payloads(&self) -> Vec<NotificationPayload> {
            self.published.lock().unwrap().clone()
        }

        fn close_count(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationPublisher for MockPublisher {
        async fn publish(&self, payload: &NotificationPayload) -> Result<(), PublishError> {
            if self.fail_publish {
                return Err(PublishError::send("broker unreachable"));
            }
            self.published.lock().unwrap().push(payload.clone());
            Ok(())
        }

        async fn close(&self) -> Result<(), PublishError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn candidate(place_id: Option<&str>, name: &str) -> PlaceCandidate {
        let mut raw = json!({ "name": name });
        if let Some(id) = place_id {
            raw["place_id"] = json!(id);
        }
        PlaceCandidate::from_result(raw)
    }

    fn reviews(count: usize) -> Vec<Review> {
        (0..count)
            .map(|i| json!({ "review_id": format!("r{}", i) }))
            .collect()
    }

    fn fixed_key() -> RunKey {
        RunKey::from_datetime(Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap())
    }

    struct Fixture {
        search: Arc<MockSearch>,
        blobs: Arc<MockBlobs>,
        publisher: Arc<MockPublisher>,
    }

    impl Fixture {
        fn new(search: MockSearch) -> Self {
            Self {
                search: Arc::new(search),
                blobs: Arc::new(MockBlobs::default()),
                publisher: Arc::new(MockPublisher::default()),
            }
        }

        fn with_publisher(mut self, publisher: MockPublisher) -> Self {
            self.publisher = Arc::new(publisher);
            self
        }

        fn orchestrator(&self) -> IngestionOrchestrator {
            self.orchestrator_with(OrchestratorConfig::default())
        }

        fn orchestrator_with(&self, config: OrchestratorConfig) -> IngestionOrchestrator {
            IngestionOrchestrator::with_config(
                self.search.clone(),
                self.blobs.clone(),
                self.publisher.clone(),
                config,
            )
        }
    }

    #[tokio::test]
    async fn test_only_candidates_with_place_id_are_processed() {
        let fixture = Fixture::new(
            MockSearch::new(vec![
                candidate(Some("p1"), "First"),
                candidate(None, "No Id"),
                candidate(Some("p3"), "Third"),
            ])
            .with_reviews("p1", reviews(2)),
        );

        let report = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap();

        assert_eq!(report.candidates, 3);
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);

        // The skipped candidate produced zero writes and zero notifications.
        let payloads = fixture.publisher.payloads();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].place_id, "p1");
        assert_eq!(payloads[1].place_id, "p3");

        // Rank reflects the original unfiltered ordering.
        assert_eq!(payloads[0].rank, 1);
        assert_eq!(payloads[1].rank, 3);

        // search results + p1 metadata + p1 chunk + p3 metadata.
        assert_eq!(fixture.blobs.paths().len(), 4);
        assert_eq!(report.blobs_written, 4);
    }

    #[tokio::test]
    async fn test_search_results_blob_written_at_slug_path() {
        let fixture = Fixture::new(MockSearch::new(vec![candidate(Some("p1"), "First")]));

        fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("Coffee Shop"), fixed_key())
            .await
            .unwrap();

        let expected = "search/coffee-shop/2026-08-07-120000/search_results.json";
        assert_eq!(fixture.blobs.paths()[0], expected);

        let body = fixture.blobs.body_of(expected);
        assert_eq!(body["query"], "Coffee Shop");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blob_paths_follow_chunk_arithmetic() {
        let fixture = Fixture::new(
            MockSearch::new(vec![candidate(Some("p1"), "Busy Place")])
                .with_reviews("p1", reviews(450)),
        );

        let job = JobRequest::new("coffee").with_max_reviews(450);
        fixture
            .orchestrator()
            .run_with_key(&job, fixed_key())
            .await
            .unwrap();

        let payload = &fixture.publisher.payloads()[0];
        assert_eq!(payload.review_count, 450);
        // 1 metadata blob + ceil(450 / 200) chunks.
        assert_eq!(payload.blob_paths.len(), 4);

        assert_eq!(
            payload.blob_paths[0],
            "raw/p1/2026-08-07-120000/metadata.json"
        );
        assert_eq!(
            payload.blob_paths[1],
            "raw/p1/2026-08-07-120000/reviews-0001.json"
        );
        assert_eq!(
            payload.blob_paths[2],
            "raw/p1/2026-08-07-120000/reviews-0002.json"
        );
        assert_eq!(
            payload.blob_paths[3],
            "raw/p1/2026-08-07-120000/reviews-0003.json"
        );

        // The last chunk carries the remainder.
        let last = fixture.blobs.body_of(&payload.blob_paths[3]);
        assert_eq!(last.as_array().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_chunk_numbering_is_contiguous_after_skips() {
        let fixture = Fixture::new(
            MockSearch::new(vec![
                candidate(None, "Skipped"),
                candidate(Some("p2"), "Second"),
            ])
            .with_reviews("p2", reviews(201)),
        );

        let job = JobRequest::new("coffee").with_max_reviews(300);
        fixture
            .orchestrator()
            .run_with_key(&job, fixed_key())
            .await
            .unwrap();

        let payload = &fixture.publisher.payloads()[0];
        assert_eq!(payload.rank, 2);
        assert_eq!(
            payload.blob_paths[1],
            "raw/p2/2026-08-07-120000/reviews-0001.json"
        );
        assert_eq!(
            payload.blob_paths[2],
            "raw/p2/2026-08-07-120000/reviews-0002.json"
        );
    }

    #[tokio::test]
    async fn test_zero_review_place_still_notifies() {
        let fixture = Fixture::new(MockSearch::new(vec![candidate(Some("p1"), "Quiet Place")]));

        let report = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap();

        let payloads = fixture.publisher.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].review_count, 0);
        assert_eq!(payloads[0].blob_paths.len(), 1);
        assert_eq!(payloads[0].place_name.as_deref(), Some("Quiet Place"));
        assert_eq!(report.notifications_sent, 1);
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_abort_the_run() {
        let fixture = Fixture::new(
            MockSearch::new(vec![
                candidate(Some("p1"), "First"),
                candidate(Some("p2"), "Second"),
            ])
            .with_reviews("p1", reviews(1))
            .with_reviews("p2", reviews(1)),
        )
        .with_publisher(MockPublisher::failing());

        let report = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap();

        // Both places fully processed; both notifications lost.
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.notifications_sent, 0);
        assert_eq!(report.blobs_written, 5);
        assert_eq!(fixture.publisher.close_count(), 1);
    }

    #[tokio::test]
    async fn test_place_failure_continues_under_default_policy() {
        let fixture = Fixture::new(
            MockSearch::new(vec![
                candidate(Some("p1"), "Failing"),
                candidate(Some("p2"), "Healthy"),
            ])
            .with_reviews("p2", reviews(1))
            .failing_reviews_for("p1"),
        );

        let report = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);

        let payloads = fixture.publisher.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].place_id, "p2");
        assert_eq!(payloads[0].rank, 2);
        assert_eq!(fixture.publisher.close_count(), 1);
    }

    #[tokio::test]
    async fn test_place_failure_aborts_under_abort_policy() {
        let fixture = Fixture::new(
            MockSearch::new(vec![
                candidate(Some("p1"), "Failing"),
                candidate(Some("p2"), "Never Reached"),
            ])
            .failing_reviews_for("p1"),
        );

        let config = OrchestratorConfig {
            place_error_policy: PlaceErrorPolicy::AbortOnPlaceError,
            ..OrchestratorConfig::default()
        };
        let err = fixture
            .orchestrator_with(config)
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::PlaceError { ref place_id, .. } if place_id.as_str() == "p1"
        ));
        assert!(fixture.publisher.payloads().is_empty());

        // The producer is still released exactly once.
        assert_eq!(fixture.publisher.close_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_fails_before_any_io() {
        let fixture = Fixture::new(MockSearch::new(vec![]));

        let err = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("   "), fixed_key())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidJob(_)));
        assert_eq!(fixture.search.search_calls.load(Ordering::SeqCst), 0);
        assert!(fixture.blobs.paths().is_empty());
        assert_eq!(fixture.publisher.close_count(), 0);
    }

    #[tokio::test]
    async fn test_search_failure_is_run_fatal() {
        let fixture = Fixture::new(MockSearch::new(vec![]).failing_search());

        let err = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::SearchError(_)));
        assert!(fixture.blobs.paths().is_empty());
        assert_eq!(fixture.publisher.close_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_search_result_completes_cleanly() {
        let fixture = Fixture::new(MockSearch::new(vec![]));

        let report = fixture
            .orchestrator()
            .run_with_key(&JobRequest::new("coffee"), fixed_key())
            .await
            .unwrap();

        assert_eq!(report.candidates, 0);
        assert_eq!(report.blobs_written, 1);
        assert_eq!(fixture.publisher.close_count(), 1);
    }

    #[tokio::test]
    async fn test_rerun_with_same_key_overwrites_paths() {
        let fixture = Fixture::new(
            MockSearch::new(vec![candidate(Some("p1"), "First")]).with_reviews("p1", reviews(3)),
        );

        let job = JobRequest::new("coffee");
        let orchestrator = fixture.orchestrator();
        orchestrator.run_with_key(&job, fixed_key()).await.unwrap();

        let first_run: HashSet<String> = fixture.blobs.paths().into_iter().collect();

        orchestrator.run_with_key(&job, fixed_key()).await.unwrap();

        let both_runs: HashSet<String> = fixture.blobs.paths().into_iter().collect();
        assert_eq!(first_run, both_runs);
    }

    #[tokio::test]
    async fn test_max_reviews_caps_the_fetch() {
        let fixture = Fixture::new(
            MockSearch::new(vec![candidate(Some("p1"), "First")]).with_reviews("p1", reviews(50)),
        );

        let job = JobRequest::new("coffee").with_max_reviews(40);
        fixture
            .orchestrator()
            .run_with_key(&job, fixed_key())
            .await
            .unwrap();

        let payload = &fixture.publisher.payloads()[0];
        assert_eq!(payload.review_count, 40);
        assert_eq!(payload.blob_paths.len(), 2);
    }
}
