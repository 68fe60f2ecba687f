//! Freshdesk service object definitions.
//!
//! Records returned by the API keep their known fields typed and retain
//! everything else in a flattened attribute bag, so the catalogue-driven
//! mapping can address any default or custom field by name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outbound create/update payload for a contact.
///
/// Payloads are dynamic attribute bags; which keys are present is decided
/// by the configured field mappings and the live field catalogue.
pub type FreshdeskContactPayload = Map<String, Value>;

/// Outbound create/update payload for a company.
pub type FreshdeskCompanyPayload = Map<String, Value>;

/// Extract the email lookup value from a contact payload.
#[must_use]
pub fn payload_email(payload: &FreshdeskContactPayload) -> Option<&str> {
    payload.get("email").and_then(Value::as_str)
}

/// Extract the domain lookup values from a company payload.
#[must_use]
pub fn payload_domains(payload: &FreshdeskCompanyPayload) -> Option<Vec<String>> {
    let domains = payload.get("domains")?.as_array()?;
    Some(
        domains
            .iter()
            .filter_map(|d| d.as_str().map(str::to_string))
            .collect(),
    )
}

/// Check whether a payload resolved a non-null `name`.
#[must_use]
pub fn payload_has_name(payload: &FreshdeskCompanyPayload) -> bool {
    matches!(payload.get("name"), Some(v) if !v.is_null())
}

/// A Freshdesk contact as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskContact {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub custom_fields: Option<Map<String, Value>>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Remaining default fields (phone, job_title, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A Freshdesk company as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskCompany {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domains: Option<Vec<String>>,
    #[serde(default)]
    pub custom_fields: Option<Map<String, Value>>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Remaining default fields (description, note, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl FreshdeskCompany {
    /// Domains as a slice; empty when absent.
    #[must_use]
    pub fn domains(&self) -> &[String] {
        self.domains.as_deref().unwrap_or(&[])
    }
}

/// One field in the live contact field catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskContactField {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Built-in field; custom fields nest under `custom_fields`.
    #[serde(default)]
    pub default: bool,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One field in the live company field catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskCompanyField {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Built-in field; custom fields nest under `custom_fields`.
    #[serde(default)]
    pub default: bool,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Expanded requester sub-resource on a ticket (`include=requester`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskRequester {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Freshdesk ticket as returned by the list API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskTicket {
    pub id: i64,
    #[serde(default)]
    pub requester_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<FreshdeskRequester>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub source: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Remaining scalar ticket fields (subject, type, cc_emails, ...).
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Ticket priority codes with their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    /// Resolve a numeric API code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(TicketPriority::Low),
            2 => Some(TicketPriority::Medium),
            3 => Some(TicketPriority::High),
            4 => Some(TicketPriority::Urgent),
            _ => None,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }
}

/// Ticket status codes with their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Open,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Resolve a numeric API code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2 => Some(TicketStatus::Open),
            3 => Some(TicketStatus::Pending),
            4 => Some(TicketStatus::Resolved),
            5 => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Pending => "Pending",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

/// Ticket source channel codes with their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketSource {
    Email,
    Portal,
    Phone,
    Chat,
    FeedbackWidget,
    OutboundEmail,
}

impl TicketSource {
    /// Resolve a numeric API code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(TicketSource::Email),
            2 => Some(TicketSource::Portal),
            3 => Some(TicketSource::Phone),
            7 => Some(TicketSource::Chat),
            9 => Some(TicketSource::FeedbackWidget),
            10 => Some(TicketSource::OutboundEmail),
            _ => None,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TicketSource::Email => "Email",
            TicketSource::Portal => "Portal",
            TicketSource::Phone => "Phone",
            TicketSource::Chat => "Chat",
            TicketSource::FeedbackWidget => "Feedback Widget",
            TicketSource::OutboundEmail => "Outbound Email",
        }
    }
}

/// The currently authenticated agent (`GET /agents/me`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskAgent {
    pub id: i64,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub contact: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result envelope of a filter/search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskFilterResult<T> {
    pub total: i64,
    pub results: Vec<T>,
}

/// One page of a paged list call.
///
/// `has_more` is derived purely from the presence of a `Link` response
/// header, never from a body field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskPagedResult<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

/// Structured error body returned by the Freshdesk API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskErrorBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub errors: Vec<FreshdeskFieldError>,
}

/// One per-field entry in a structured error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshdeskFieldError {
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_retains_unknown_default_fields() {
        let contact: FreshdeskContact = serde_json::from_value(json!({
            "id": 23,
            "name": "Jane Smith",
            "email": "jane@hull.io",
            "job_title": "CEO",
            "active": true,
            "custom_fields": { "department": "Sales" },
            "created_at": "2020-06-01T00:00:00Z",
            "updated_at": "2020-06-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(contact.id, 23);
        assert_eq!(contact.attributes.get("job_title"), Some(&json!("CEO")));
        assert_eq!(
            contact.custom_fields.as_ref().unwrap().get("department"),
            Some(&json!("Sales"))
        );
    }

    #[test]
    fn test_company_domains_accessor() {
        let company: FreshdeskCompany = serde_json::from_value(json!({
            "id": 8,
            "name": "Hull Inc",
            "domains": ["hull.io", "hull.com"],
            "created_at": "2020-06-01T00:00:00Z",
            "updated_at": "2020-06-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(company.domains(), &["hull.io", "hull.com"]);

        let company: FreshdeskCompany =
            serde_json::from_value(json!({ "id": 9, "name": "No Domains" })).unwrap();
        assert!(company.domains().is_empty());
    }

    #[test]
    fn test_payload_helpers() {
        let mut payload = FreshdeskContactPayload::new();
        assert!(payload_email(&payload).is_none());
        payload.insert("email".to_string(), json!("jane@hull.io"));
        assert_eq!(payload_email(&payload), Some("jane@hull.io"));

        let mut payload = FreshdeskCompanyPayload::new();
        assert!(payload_domains(&payload).is_none());
        assert!(!payload_has_name(&payload));
        payload.insert("domains".to_string(), json!(["hull.io"]));
        payload.insert("name".to_string(), json!("Hull Inc"));
        assert_eq!(payload_domains(&payload), Some(vec!["hull.io".to_string()]));
        assert!(payload_has_name(&payload));

        payload.insert("name".to_string(), Value::Null);
        assert!(!payload_has_name(&payload));
    }

    #[test]
    fn test_ticket_enum_code_tables() {
        assert_eq!(TicketPriority::from_code(1).unwrap().label(), "Low");
        assert_eq!(TicketPriority::from_code(4).unwrap().label(), "Urgent");
        assert!(TicketPriority::from_code(9).is_none());

        assert_eq!(TicketStatus::from_code(2).unwrap().label(), "Open");
        assert_eq!(TicketStatus::from_code(5).unwrap().label(), "Closed");
        assert!(TicketStatus::from_code(1).is_none());

        assert_eq!(TicketSource::from_code(2).unwrap().label(), "Portal");
        assert_eq!(
            TicketSource::from_code(9).unwrap().label(),
            "Feedback Widget"
        );
        assert!(TicketSource::from_code(4).is_none());
    }

    #[test]
    fn test_error_body_deserializes() {
        let body: FreshdeskErrorBody = serde_json::from_value(json!({
            "description": "Validation failed",
            "errors": [
                { "field": "email", "message": "Email is invalid", "code": "invalid_value" }
            ]
        }))
        .unwrap();
        assert_eq!(body.description.as_deref(), Some("Validation failed"));
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].message, "Email is invalid");
    }

    #[test]
    fn test_contact_field_default_flag() {
        let field: FreshdeskContactField = serde_json::from_value(json!({
            "id": 1,
            "name": "email",
            "label": "Email",
            "default": true,
            "type": "default_email"
        }))
        .unwrap();
        assert!(field.default);
        assert_eq!(field.field_type.as_deref(), Some("default_email"));

        let field: FreshdeskContactField = serde_json::from_value(json!({
            "id": 2,
            "name": "department",
            "label": "Department"
        }))
        .unwrap();
        assert!(!field.default);
    }

    #[test]
    fn test_company_field_type_key() {
        let field: FreshdeskCompanyField = serde_json::from_value(json!({
            "id": 1,
            "name": "tier",
            "label": "Tier",
            "default": false,
            "type": "custom_dropdown"
        }))
        .unwrap();
        assert_eq!(field.field_type.as_deref(), Some("custom_dropdown"));
        assert!(!field.extra.contains_key("type"));
    }
}
