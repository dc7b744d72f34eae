#![forbid(unsafe_code)]

use crate::SurveyServer;
use crate::admin::{self, AdminError};
use crate::support::{fail, store_failure};
use serde_json::{Value, json};

impl SurveyServer {
    pub(crate) fn op_validate_admin(&mut self, body: &Value) -> Value {
        let password = str_field(body, "password");
        match admin::authenticate(&mut self.store, password) {
            Ok(valid) => {
                if valid {
                    tracing::info!("admin validation succeeded");
                } else {
                    tracing::warn!("admin validation failed");
                }
                json!({ "success": valid })
            }
            Err(err) => {
                tracing::error!(error = %err, "admin validation unavailable");
                json!({ "success": false })
            }
        }
    }

    pub(crate) fn op_reset_data(&mut self, body: &Value) -> Value {
        let password = str_field(body, "password");
        match admin::authenticate(&mut self.store, password) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("unauthorized reset attempt");
                return fail("Invalid admin password");
            }
            Err(err) => return admin_failure("Failed to reset data", err),
        }

        match self.store.reset_all() {
            Ok(()) => {
                tracing::info!("all survey data reset");
                json!({ "success": true, "message": "All data reset successfully" })
            }
            Err(err) => store_failure("Failed to reset data", err),
        }
    }

    pub(crate) fn op_change_password(&mut self, body: &Value) -> Value {
        let current = str_field(body, "current_password");
        let new_password = str_field(body, "new_password");

        match admin::rotate(&mut self.store, current, new_password) {
            Ok(()) => {
                tracing::info!("admin password rotated");
                json!({ "success": true, "message": "Password changed successfully" })
            }
            Err(AdminError::Auth) => {
                tracing::warn!("password rotation rejected: wrong current password");
                fail("Current password is incorrect")
            }
            Err(AdminError::Validation(_)) => {
                fail("New password must be at least 6 characters")
            }
            Err(err) => admin_failure("Failed to change password", err),
        }
    }
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(|v| v.as_str()).unwrap_or("")
}

fn admin_failure(summary: &'static str, err: AdminError) -> Value {
    tracing::error!(error = %err, summary, "admin operation failed");
    fail(summary)
}
