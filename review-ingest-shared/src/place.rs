//! Place candidate type produced by the search client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque review object as returned by the provider.
///
/// Review identity is the provider's responsibility; nothing here
/// deduplicates or inspects review contents.
pub type Review = Value;

/// One search result entry representing a physical location.
///
/// `place_id` is the provider-issued identifier downstream stages key on.
/// A candidate without one is a valid, non-fatal state: the orchestrator
/// logs and skips it without failing the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Provider-issued place identifier, when present.
    pub place_id: Option<String>,
    /// Secondary provider identifier, when present.
    pub data_id: Option<String>,
    /// The untouched provider result object.
    pub raw: Value,
}

impl PlaceCandidate {
    /// Build a candidate from one provider result object, lifting out the
    /// identifier fields and keeping the full object as `raw`.
    ///
    /// Empty-string identifiers are treated as absent.
    pub fn from_result(raw: Value) -> Self {
        let place_id = extract_id(&raw, "place_id");
        let data_id = extract_id(&raw, "data_id");

        Self {
            place_id,
            data_id,
            raw,
        }
    }

    /// Display name from the raw result, when the provider supplied one.
    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }
}

fn extract_id(raw: &Value, field: &str) -> Option<String> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
