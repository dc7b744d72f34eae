#![forbid(unsafe_code)]

use crate::SurveyServer;
use crate::support::store_failure;
use serde_json::{Value, json};
use survey_core::stats;

impl SurveyServer {
    pub(crate) fn op_stats(&mut self) -> Value {
        let raw = match self.store.summary_stats() {
            Ok(raw) => raw,
            Err(err) => return store_failure("Failed to get statistics", err),
        };

        // totalRatings counts answered (positive) ratings only; a stored 0
        // means "unanswered" and is excluded from the average and the total.
        let avg_satisfaction =
            stats::average_satisfaction(raw.positive_rating_sum, raw.positive_rating_count);
        let recommendation_rate =
            stats::recommendation_rate(raw.high_rating_count, raw.positive_rating_count);
        let data_size_kb =
            stats::estimated_size_kb(raw.total_responses, raw.total_rating_rows, raw.feedback_count);

        let category_breakdown = raw
            .category_breakdown
            .into_iter()
            .map(|entry| json!({ "category": entry.category, "count": entry.count }))
            .collect::<Vec<_>>();

        json!({
            "success": true,
            "stats": {
                "totalResponses": raw.total_responses,
                "avgSatisfaction": avg_satisfaction,
                "totalRatings": raw.positive_rating_count,
                "recommendationRate": recommendation_rate,
                "categoryBreakdown": category_breakdown,
                "dataSizeKB": data_size_kb,
            }
        })
    }
}
