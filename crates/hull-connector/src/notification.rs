//! Decoded platform change notifications.
//!
//! The platform SDK delivers these messages; the connector only consumes
//! them. Attribute bags are dynamic JSON objects because the platform
//! schema is user-defined.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A platform segment a user or account belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullSegment {
    /// Segment id, matched against the configured whitelists.
    pub id: String,
    /// Human-readable segment name.
    #[serde(default)]
    pub name: String,
}

/// A user change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullUserUpdateMessage {
    /// User attribute bag (includes `traits_`-prefixed connector traits).
    pub user: Value,
    /// Attribute bag of the account the user belongs to, if any.
    #[serde(default)]
    pub account: Value,
    /// Segments the user currently belongs to.
    #[serde(default)]
    pub segments: Vec<HullSegment>,
    /// Raw changes payload, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Value>,
}

/// An account change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullAccountUpdateMessage {
    /// Account attribute bag.
    pub account: Value,
    /// Segments the account currently belongs to.
    #[serde(default)]
    pub account_segments: Vec<HullSegment>,
    /// Raw changes payload, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Value>,
}

/// Resolve a dot-separated attribute path against a JSON object.
///
/// Path segments may themselves contain slashes (`traits_freshdesk/id`
/// is a single segment); only dots separate segments.
#[must_use]
pub fn get_attribute<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = object;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Resolve an attribute path to a numeric service id.
///
/// Accepts both numeric values and numeric strings; anything else is
/// treated as absent.
#[must_use]
pub fn get_service_id(object: &Value, path: &str) -> Option<i64> {
    match get_attribute(object, path)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_attribute_single_segment() {
        let user = json!({ "email": "test@hull.io", "traits_freshdesk/id": 23 });
        assert_eq!(
            get_attribute(&user, "email"),
            Some(&json!("test@hull.io"))
        );
        assert_eq!(
            get_attribute(&user, "traits_freshdesk/id"),
            Some(&json!(23))
        );
        assert_eq!(get_attribute(&user, "missing"), None);
    }

    #[test]
    fn test_get_attribute_nested_path() {
        let combined = json!({ "name": "Jane", "account": { "domain": "hull.io" } });
        assert_eq!(
            get_attribute(&combined, "account.domain"),
            Some(&json!("hull.io"))
        );
        assert_eq!(get_attribute(&combined, "account.missing"), None);
    }

    #[test]
    fn test_get_service_id_accepts_number_and_string() {
        let user = json!({ "traits_freshdesk/id": 23 });
        assert_eq!(get_service_id(&user, "traits_freshdesk/id"), Some(23));

        let user = json!({ "traits_freshdesk/id": "42" });
        assert_eq!(get_service_id(&user, "traits_freshdesk/id"), Some(42));

        let user = json!({ "traits_freshdesk/id": true });
        assert_eq!(get_service_id(&user, "traits_freshdesk/id"), None);

        let user = json!({});
        assert_eq!(get_service_id(&user, "traits_freshdesk/id"), None);
    }

    #[test]
    fn test_user_message_deserializes_with_defaults() {
        let message: HullUserUpdateMessage = serde_json::from_value(json!({
            "user": { "email": "test@hull.io" }
        }))
        .unwrap();
        assert!(message.segments.is_empty());
        assert!(message.account.is_null());
        assert!(message.changes.is_none());
    }
}
