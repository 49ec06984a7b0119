//! Review sort modes supported by the search provider.

use serde::{Deserialize, Serialize};

/// Provider-side ordering applied to review pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewSort {
    /// The most relevant reviews (provider default).
    #[default]
    QualityScore,
    /// The most recent reviews.
    NewestFirst,
    /// The highest rated reviews.
    RatingHigh,
    /// The lowest rated reviews.
    RatingLow,
}

impl ReviewSort {
    /// Wire value for the `sort_by` request parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QualityScore => "qualityScore",
            Self::NewestFirst => "newestFirst",
            Self::RatingHigh => "ratingHigh",
            Self::RatingLow => "ratingLow",
        }
    }
}
