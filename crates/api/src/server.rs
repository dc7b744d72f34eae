#![forbid(unsafe_code)]

use crate::SurveyServer;
use crate::support::fail;
use serde_json::Value;
use survey_storage::SqliteStore;

impl SurveyServer {
    pub(crate) fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// Routes one request to its operation, mirroring the external
    /// `METHOD:action` surface. Every branch returns a `{success, ...}`
    /// body; nothing escapes as a panic or raw error.
    pub(crate) fn handle(&mut self, method: &str, action: &str, body: &Value) -> Value {
        match (method, action) {
            ("POST", "submit") => self.op_submit(body),
            ("GET", "surveys") => self.op_surveys(),
            ("GET", "stats") => self.op_stats(),
            ("POST", "validate_admin") => self.op_validate_admin(body),
            ("POST", "reset_data") => self.op_reset_data(body),
            ("POST", "change_password") => self.op_change_password(body),
            _ => {
                tracing::warn!(method, action, "unknown action requested");
                fail(&format!("Invalid action: {action}"))
            }
        }
    }
}
