#![forbid(unsafe_code)]

use serde_json::{Value, json};
use survey_storage::StoreError;

pub(crate) fn fail(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

/// Converts a store failure into the uniform failure body. The caller-facing
/// message is a safe summary; the underlying error text goes to the log only.
pub(crate) fn store_failure(summary: &'static str, err: StoreError) -> Value {
    tracing::error!(error = %err, summary, "store operation failed");
    fail(summary)
}
