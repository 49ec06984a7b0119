//! Deterministic blob path construction for one ingestion run.
//!
//! All paths partition by a [`RunKey`], so no two writes within a run can
//! collide and a re-run pinned to the same key overwrites the previous
//! run's blobs instead of duplicating them.

use std::fmt;

use chrono::{DateTime, Utc};

/// Timestamp-derived partition component grouping all writes from one run.
///
/// Formatted as UTC `YYYY-MM-DD-HHMMSS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunKey(String);

impl RunKey {
    /// Key for a run starting now.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Key for a run pinned to an explicit instant.
    ///
    /// Used to re-target a previous run's partition for idempotent
    /// reprocessing.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format("%Y-%m-%d-%H%M%S").to_string())
    }

    /// The key as a path component.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slug of a search query for use as a path component.
///
/// Lowercases alphanumerics (Unicode-aware) and replaces every other
/// character with exactly one `-`; leading and trailing separators are
/// trimmed. Consecutive offending characters each keep their own separator
/// rather than being collapsed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Path of the search-results blob for one run.
pub fn search_results_path(query: &str, run_key: &RunKey) -> String {
    format!("search/{}/{}/search_results.json", slugify(query), run_key)
}

/// Path of a place's raw metadata blob.
pub fn metadata_path(place_id: &str, run_key: &RunKey) -> String {
    format!("raw/{}/{}/metadata.json", place_id, run_key)
}

/// Path of one review chunk blob. `seq` is the 1-based chunk index.
pub fn review_chunk_path(place_id: &str, run_key: &RunKey, seq: usize) -> String {
    format!("raw/{}/{}/reviews-{:04}.json", place_id, run_key, seq)
}
