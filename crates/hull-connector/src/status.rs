//! Connector status and metadata-fields responses.

use serde::{Deserialize, Serialize};

use crate::types::ConnectorStatusKind;

/// Health-check response exposed to the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorStatusResponse {
    /// Overall status, the most severe one encountered.
    pub status: ConnectorStatusKind,
    /// Human-readable messages explaining the status.
    pub messages: Vec<String>,
}

impl ConnectorStatusResponse {
    /// Create an `ok` response with no messages.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: ConnectorStatusKind::Ok,
            messages: Vec::new(),
        }
    }
}

impl Default for ConnectorStatusResponse {
    fn default() -> Self {
        Self::ok()
    }
}

/// One selectable field in a metadata-fields response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsSchemaOption {
    /// Technical field name.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// Metadata-fields response backing the settings UI field pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsSchema {
    /// Whether the field catalogue could be retrieved.
    pub ok: bool,
    /// Error message when retrieval failed.
    pub error: Option<String>,
    /// Selectable fields.
    pub options: Vec<FieldsSchemaOption>,
}

impl FieldsSchema {
    /// Create a successful schema from options.
    #[must_use]
    pub fn from_options(options: Vec<FieldsSchemaOption>) -> Self {
        Self {
            ok: true,
            error: None,
            options,
        }
    }

    /// Create a failed schema carrying an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            options: Vec::new(),
        }
    }
}
