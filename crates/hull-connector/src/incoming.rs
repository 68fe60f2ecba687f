//! Inbound data ready for the platform.
//!
//! The mapping engine converts service records into [`IncomingData`],
//! which the orchestrator hands to the platform's identity/trait or
//! identity/event sink.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Kind of platform object an inbound record resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomingObjectType {
    /// A user profile attribute write.
    User,
    /// An account profile attribute write.
    Account,
    /// A behavioral event.
    Event,
}

impl IncomingObjectType {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomingObjectType::User => "user",
            IncomingObjectType::Account => "account",
            IncomingObjectType::Event => "event",
        }
    }
}

impl fmt::Display for IncomingObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity claims resolving an inbound record to a platform profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentClaims {
    /// Email claim (users).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Domain claim (accounts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Anonymous id claim, typically `<service>:<id>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,
}

impl IdentClaims {
    /// Check whether no claim is present at all.
    ///
    /// An event with empty claims is still emitted but cannot be
    /// attributed to a known profile by the platform.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.domain.is_none() && self.anonymous_id.is_none()
    }
}

/// Build an attribute value carrying the `setIfNull` operation.
///
/// The platform never overwrites an already-set attribute for these.
#[must_use]
pub fn set_if_null(value: impl Into<Value>) -> Value {
    json!({ "value": value.into(), "operation": "setIfNull" })
}

/// One inbound record, mapped and ready for the platform sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingData {
    /// Kind of platform object.
    pub object_type: IncomingObjectType,
    /// Identity claims.
    pub ident: IdentClaims,
    /// Profile attributes to upsert.
    pub attributes: Map<String, Value>,
    /// Event properties; present only for events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Event context (carries the deterministic `event_id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    /// Event name; present only for events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
}

impl IncomingData {
    /// Create an empty attribute write of the given kind.
    #[must_use]
    pub fn new(object_type: IncomingObjectType) -> Self {
        Self {
            object_type,
            ident: IdentClaims::default(),
            attributes: Map::new(),
            properties: None,
            context: None,
            event_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_claims_is_empty() {
        let claims = IdentClaims::default();
        assert!(claims.is_empty());

        let claims = IdentClaims {
            anonymous_id: Some("freshdesk:5".to_string()),
            ..Default::default()
        };
        assert!(!claims.is_empty());
    }

    #[test]
    fn test_set_if_null_shape() {
        let value = set_if_null(42);
        assert_eq!(value["value"], 42);
        assert_eq!(value["operation"], "setIfNull");
    }

    #[test]
    fn test_incoming_data_new() {
        let data = IncomingData::new(IncomingObjectType::Event);
        assert_eq!(data.object_type, IncomingObjectType::Event);
        assert!(data.ident.is_empty());
        assert!(data.attributes.is_empty());
        assert!(data.event_name.is_none());
    }
}
