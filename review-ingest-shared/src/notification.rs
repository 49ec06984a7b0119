//! Queue message emitted when one place's data is fully persisted.

use serde::{Deserialize, Serialize};

/// Source marker stamped on every notification payload.
pub const NOTIFICATION_SOURCE: &str = "serpapi-google-maps";

/// Completion notification for one processed place.
///
/// Exactly one payload is built per candidate with a place_id. `blob_paths`
/// preserves write order: the metadata blob first, then review chunks in
/// page order, so a consumer can stream the blobs in the order they were
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Provider-issued place identifier.
    pub place_id: String,
    /// Display name, when the search result carried one.
    pub place_name: Option<String>,
    /// Every blob written for this place, in write order.
    pub blob_paths: Vec<String>,
    /// Epoch seconds at payload build time.
    pub fetch_ts: i64,
    /// Number of reviews persisted across all chunks.
    pub review_count: usize,
    /// Always [`NOTIFICATION_SOURCE`].
    pub source: String,
    /// The originating search query.
    pub query: String,
    /// 1-based position of the place in the original search ordering,
    /// independent of which candidates were skipped.
    pub rank: usize,
}
