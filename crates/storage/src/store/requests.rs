#![forbid(unsafe_code)]

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitSurveyRequest {
    pub category: String,
    pub ratings: BTreeMap<String, i64>,
    pub feedback: BTreeMap<String, String>,
    pub submitted_at_ms: i64,
}

/// One survey response joined with its answers, as returned by
/// [`crate::SqliteStore::list_surveys`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurveyRecord {
    pub id: i64,
    pub category: String,
    pub submitted_at_ms: i64,
    pub ratings: BTreeMap<String, i64>,
    pub feedback: BTreeMap<String, String>,
}

/// Raw aggregates for the stats surface. The derived figures (rounded
/// average, percentage, size estimate) are computed by `survey_core::stats`
/// from these counts.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub total_responses: i64,
    /// Count of stored ratings with `rating > 0`; zero means "unanswered"
    /// and is excluded here and from the sum.
    pub positive_rating_count: i64,
    pub positive_rating_sum: i64,
    /// Count of stored ratings with `rating >= 4`.
    pub high_rating_count: i64,
    /// Every stored rating row, answered or not. Feeds the size estimate.
    pub total_rating_rows: i64,
    pub feedback_count: i64,
    pub category_breakdown: Vec<CategoryCount>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}
