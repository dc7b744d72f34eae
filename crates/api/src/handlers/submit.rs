#![forbid(unsafe_code)]

use crate::SurveyServer;
use crate::support::{fail, now_ms_i64, store_failure};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use survey_storage::{StoreError, SubmitSurveyRequest};

impl SurveyServer {
    pub(crate) fn op_submit(&mut self, body: &Value) -> Value {
        let Some(body) = body.as_object() else {
            return fail("Request body must be an object");
        };

        let category = body
            .get("category")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let request = SubmitSurveyRequest {
            category,
            ratings: collect_ratings(body.get("ratings")),
            feedback: collect_feedback(body.get("feedback")),
            submitted_at_ms: now_ms_i64(),
        };

        match self.store.submit_survey(request) {
            Ok(id) => {
                tracing::info!(id, "survey submission accepted");
                json!({ "success": true, "id": id })
            }
            Err(StoreError::InvalidInput(message)) => {
                tracing::warn!(reason = message, "survey submission rejected");
                let user_message = if message == "category is too long" {
                    "Category is too long"
                } else {
                    "Category is required"
                };
                fail(user_message)
            }
            Err(err) => store_failure("Failed to submit survey", err),
        }
    }
}

fn collect_ratings(value: Option<&Value>) -> BTreeMap<String, i64> {
    let mut out = BTreeMap::new();
    let Some(map) = value.and_then(|v| v.as_object()) else {
        return out;
    };
    for (question, raw) in map {
        if let Some(rating) = coerce_rating(raw) {
            out.insert(question.clone(), rating);
        }
    }
    out
}

// Integer coercion mirrors the wire contract: numbers are truncated,
// numeric strings are parsed, anything else is skipped. Range filtering
// happens in storage.
fn coerce_rating(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        return Some(f as i64);
    }
    value.as_str().and_then(|s| s.trim().parse::<i64>().ok())
}

fn collect_feedback(value: Option<&Value>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let Some(map) = value.and_then(|v| v.as_object()) else {
        return out;
    };
    for (question, raw) in map {
        if let Some(answer) = raw.as_str() {
            out.insert(question.clone(), answer.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_rating(&json!(4)), Some(4));
        assert_eq!(coerce_rating(&json!(4.9)), Some(4));
        assert_eq!(coerce_rating(&json!("3")), Some(3));
        assert_eq!(coerce_rating(&json!(" 5 ")), Some(5));
        assert_eq!(coerce_rating(&json!("great")), None);
        assert_eq!(coerce_rating(&json!(null)), None);
        assert_eq!(coerce_rating(&json!([1])), None);
    }

    #[test]
    fn non_object_answer_maps_are_ignored() {
        assert!(collect_ratings(None).is_empty());
        assert!(collect_ratings(Some(&json!("nope"))).is_empty());
        assert!(collect_feedback(Some(&json!(42))).is_empty());
    }
}
