//! Uniform API result envelopes.
//!
//! Every service-client call is normalized into an [`ApiResultObject`]:
//! `success == true` iff `data` holds a real API payload and no error is
//! recorded; on failure `data` is `None` and at least one error message is
//! present.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ApiMethod;

/// Uniform envelope for a single service API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResultObject<R, D> {
    /// The fully resolved endpoint URL.
    pub endpoint: String,
    /// The kind of operation performed.
    pub method: ApiMethod,
    /// The payload the endpoint was invoked with, if any.
    pub record: Option<R>,
    /// The API response payload; `None` on failure.
    pub data: Option<D>,
    /// Whether the call succeeded.
    pub success: bool,
    /// Error messages; empty iff the call succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<String>,
    /// Structured error body returned by the service, preserved verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Value>,
}

impl<R, D> ApiResultObject<R, D> {
    /// Create a successful result.
    pub fn success(
        endpoint: impl Into<String>,
        method: ApiMethod,
        record: Option<R>,
        data: D,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            record,
            data: Some(data),
            success: true,
            error: Vec::new(),
            error_details: None,
        }
    }

    /// Create a failed result.
    pub fn failure(
        endpoint: impl Into<String>,
        method: ApiMethod,
        record: Option<R>,
        error: Vec<String>,
        error_details: Option<Value>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            record,
            data: None,
            success: false,
            error,
            error_details,
        }
    }

    /// Build a single human-readable error string.
    ///
    /// Concatenates the base error messages, the upstream `description`
    /// and every per-field upstream error message, in that order.
    #[must_use]
    pub fn combined_error_message(&self) -> String {
        let mut parts: Vec<String> = self.error.clone();

        if let Some(details) = &self.error_details {
            if let Some(description) = details.get("description").and_then(Value::as_str) {
                parts.push(description.to_string());
            }
            if let Some(errors) = details.get("errors").and_then(Value::as_array) {
                for entry in errors {
                    if let Some(message) = entry.get("message").and_then(Value::as_str) {
                        parts.push(message.to_string());
                    }
                }
            }
        }

        parts.join(" ")
    }
}
