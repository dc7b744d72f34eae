#![forbid(unsafe_code)]

use crate::SurveyServer;
use crate::support::{store_failure, ts_ms_to_rfc3339};
use serde_json::{Value, json};

impl SurveyServer {
    pub(crate) fn op_surveys(&mut self) -> Value {
        let records = match self.store.list_surveys() {
            Ok(records) => records,
            Err(err) => return store_failure("Failed to retrieve surveys", err),
        };

        let data = records
            .into_iter()
            .map(|record| {
                json!({
                    "id": record.id,
                    "category": record.category,
                    "timestamp": ts_ms_to_rfc3339(record.submitted_at_ms),
                    "ratings": record.ratings,
                    "feedback": record.feedback,
                })
            })
            .collect::<Vec<_>>();

        json!({ "success": true, "data": data })
    }
}
