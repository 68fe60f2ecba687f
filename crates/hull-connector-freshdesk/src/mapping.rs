//! Field mapping between Hull objects and Freshdesk records.
//!
//! Outbound mappings are resolved against the live field catalogue:
//! default fields land at the top level of the payload, everything else
//! under `custom_fields`. Inbound mappings walk the same catalogue in the
//! opposite direction. Mapping problems are never errors; they accumulate
//! as notes on the envelope.

use serde_json::{json, Map, Value};

use hull_connector::envelope::OutgoingOperationEnvelope;
use hull_connector::error::ConnectorResult;
use hull_connector::incoming::{set_if_null, IncomingData, IncomingObjectType};
use hull_connector::notification::{
    get_attribute, HullAccountUpdateMessage, HullUserUpdateMessage,
};
use hull_connector::types::SyncOperation;

use crate::config::PrivateSettings;
use crate::messages;
use crate::objects::{
    payload_has_name, FreshdeskCompany, FreshdeskCompanyField, FreshdeskCompanyPayload,
    FreshdeskContact, FreshdeskContactField, FreshdeskContactPayload, FreshdeskTicket,
    TicketPriority, TicketSource, TicketStatus,
};

/// Attribute namespace for inbound Freshdesk data.
const ATTRIBUTE_GROUP: &str = "freshdesk";

/// Maps Hull objects to Freshdesk payloads and back.
#[derive(Debug, Clone)]
pub struct MappingUtil {
    settings: PrivateSettings,
    contact_fields: Vec<FreshdeskContactField>,
    company_fields: Vec<FreshdeskCompanyField>,
}

impl MappingUtil {
    #[must_use]
    pub fn new(
        settings: &PrivateSettings,
        contact_fields: Vec<FreshdeskContactField>,
        company_fields: Vec<FreshdeskCompanyField>,
    ) -> Self {
        Self {
            settings: settings.clone(),
            contact_fields,
            company_fields,
        }
    }

    /// Resolve the outbound contact payload for a user envelope.
    ///
    /// The account attribute bag is reachable from mappings via the
    /// `account.` path prefix. When no email lookup attribute is
    /// configured the envelope is downgraded to a skip; the payload is
    /// still attached for diagnostics.
    pub fn map_hull_user_to_service_object(
        &self,
        envelope: &mut OutgoingOperationEnvelope<HullUserUpdateMessage, FreshdeskContactPayload>,
    ) {
        let mut hull_object = match &envelope.message.user {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        hull_object.insert("account".to_string(), envelope.message.account.clone());
        let hull_object = Value::Object(hull_object);

        let mut payload = FreshdeskContactPayload::new();
        let mut notes = Vec::new();

        for entry in &self.settings.contact_attributes_outbound {
            let (Some(hull), Some(service)) = (entry.hull.as_deref(), entry.service.as_deref())
            else {
                continue;
            };
            match self.contact_fields.iter().find(|f| f.name == service) {
                Some(field) => {
                    if let Some(value) = get_attribute(&hull_object, hull) {
                        place_value(&mut payload, service, field.default, value.clone());
                    }
                }
                None => notes.push(messages::validation_warn_invalid_mapping_out(
                    "contact", service,
                )),
            }
        }

        match self.settings.contact_lookup_attribute_email.as_deref() {
            Some(lookup) => {
                if let Some(email) = get_attribute(&hull_object, lookup) {
                    if !email.is_null() {
                        payload.insert("email".to_string(), email.clone());
                    }
                }
            }
            None => {
                envelope.operation = SyncOperation::Skip;
                notes.push(messages::VALIDATION_SKIP_CONTACT_NOEMAILLOOKUP.to_string());
            }
        }

        for note in notes {
            envelope.add_note(note);
        }
        envelope.service_object = Some(payload);
    }

    /// Resolve the outbound company payload for an account envelope.
    ///
    /// A company without a resolvable name cannot be written; Freshdesk
    /// treats name as mandatory.
    pub fn map_hull_account_to_service_object(
        &self,
        envelope: &mut OutgoingOperationEnvelope<HullAccountUpdateMessage, FreshdeskCompanyPayload>,
    ) {
        let hull_object = envelope.message.account.clone();

        let mut payload = FreshdeskCompanyPayload::new();
        let mut notes = Vec::new();

        for entry in &self.settings.account_attributes_outbound {
            let (Some(hull), Some(service)) = (entry.hull.as_deref(), entry.service.as_deref())
            else {
                continue;
            };
            match self.company_fields.iter().find(|f| f.name == service) {
                Some(field) => {
                    if let Some(value) = get_attribute(&hull_object, hull) {
                        place_value(&mut payload, service, field.default, value.clone());
                    }
                }
                None => notes.push(messages::validation_warn_invalid_mapping_out(
                    "company", service,
                )),
            }
        }

        match self.settings.account_lookup_attribute_domain.as_deref() {
            Some(lookup) => {
                if let Some(domain) = get_attribute(&hull_object, lookup) {
                    if !domain.is_null() {
                        payload.insert("domains".to_string(), json!([domain.clone()]));
                    }
                }
            }
            None => {
                envelope.operation = SyncOperation::Skip;
                notes.push(messages::VALIDATION_SKIP_ACCOUNT_NODOMAINLOOKUP.to_string());
            }
        }

        if !payload_has_name(&payload) {
            envelope.operation = SyncOperation::Skip;
            notes.push(messages::VALIDATION_SKIP_ACCOUNT_NONAMEMAPPING.to_string());
        }

        for note in notes {
            envelope.add_note(note);
        }
        envelope.service_object = Some(payload);
    }

    /// Map a contact to an inbound user attribute write.
    pub fn map_service_object_to_hull_user(
        &self,
        contact: &FreshdeskContact,
    ) -> ConnectorResult<IncomingData> {
        let contact_value = serde_json::to_value(contact)?;
        let mut data = IncomingData::new(IncomingObjectType::User);

        for entry in &self.settings.contact_attributes_inbound {
            let (Some(hull), Some(service)) = (entry.hull.as_deref(), entry.service.as_deref())
            else {
                continue;
            };
            let Some(field) = self.contact_fields.iter().find(|f| f.name == service) else {
                continue;
            };
            let attribute = hull.strip_prefix("traits_").unwrap_or(hull);
            let value = if field.default {
                get_attribute(&contact_value, service).cloned()
            } else {
                contact
                    .custom_fields
                    .as_ref()
                    .and_then(|cf| cf.get(service))
                    .cloned()
            };
            if let Some(value) = value {
                data.attributes.insert(attribute.to_string(), value);
            }
        }

        if let Some(email) = &contact.email {
            data.ident.email = Some(email.clone());
            data.attributes
                .insert(format!("{ATTRIBUTE_GROUP}/email"), json!(email));
        }
        data.ident.anonymous_id = Some(format!("{ATTRIBUTE_GROUP}:{}", contact.id));
        data.attributes
            .insert(format!("{ATTRIBUTE_GROUP}/id"), set_if_null(contact.id));

        Ok(data)
    }

    /// Map a company to an inbound account attribute write.
    pub fn map_service_object_to_hull_account(
        &self,
        company: &FreshdeskCompany,
    ) -> ConnectorResult<IncomingData> {
        let company_value = serde_json::to_value(company)?;
        let mut data = IncomingData::new(IncomingObjectType::Account);

        for entry in &self.settings.account_attributes_inbound {
            let (Some(hull), Some(service)) = (entry.hull.as_deref(), entry.service.as_deref())
            else {
                continue;
            };
            let Some(field) = self.company_fields.iter().find(|f| f.name == service) else {
                continue;
            };
            let value = if field.default {
                get_attribute(&company_value, service).cloned()
            } else {
                company
                    .custom_fields
                    .as_ref()
                    .and_then(|cf| cf.get(service))
                    .cloned()
            };
            if let Some(value) = value {
                data.attributes.insert(hull.to_string(), value);
            }
        }

        let domains = company.domains();
        if !domains.is_empty() {
            data.ident.domain = Some(domains[0].clone());
            data.attributes
                .insert(format!("{ATTRIBUTE_GROUP}/domains"), json!(domains));
        }
        data.ident.anonymous_id = Some(format!("{ATTRIBUTE_GROUP}:{}", company.id));
        data.attributes
            .insert(format!("{ATTRIBUTE_GROUP}/id"), set_if_null(company.id));

        Ok(data)
    }

    /// Map a ticket to an inbound behavioral event.
    ///
    /// The event id is deterministic so replayed fetches can be
    /// deduplicated downstream. Attachments and the expanded requester
    /// are dropped from the properties; `custom_fields` and `stats`
    /// flatten with a `<group>__<key>` convention.
    pub fn map_ticket_to_hull_event(
        &self,
        ticket: &FreshdeskTicket,
    ) -> ConnectorResult<IncomingData> {
        let mut data = IncomingData::new(IncomingObjectType::Event);
        data.event_name = Some(if ticket.created_at == ticket.updated_at {
            "Ticket created".to_string()
        } else {
            "Ticket updated".to_string()
        });

        let mut context = Map::new();
        context.insert(
            "event_id".to_string(),
            json!(format!("fd-{}-{}", ticket.id, ticket.updated_at)),
        );
        context.insert("ip".to_string(), json!(0));
        context.insert("source".to_string(), json!(ATTRIBUTE_GROUP));
        data.context = Some(context);

        if let Some(requester_id) = ticket.requester_id {
            data.ident.anonymous_id = Some(format!("{ATTRIBUTE_GROUP}:{requester_id}"));
        }
        if let Some(email) = ticket.requester.as_ref().and_then(|r| r.email.as_ref()) {
            data.ident.email = Some(email.clone());
        }

        let ticket_value = serde_json::to_value(ticket)?;
        let mut properties = Map::new();
        if let Value::Object(fields) = ticket_value {
            for (key, value) in fields {
                match key.as_str() {
                    "attachments" | "requester" => {}
                    "custom_fields" | "stats" => {
                        if let Value::Object(group) = value {
                            for (inner, inner_value) in group {
                                properties.insert(
                                    format!("{key}__{}", to_snake_case(&inner)),
                                    inner_value,
                                );
                            }
                        }
                    }
                    _ => {
                        properties.insert(key, value);
                    }
                }
            }
        }

        if let Some(priority) = ticket.priority.and_then(TicketPriority::from_code) {
            properties.insert("priority_name".to_string(), json!(priority.label()));
        }
        if let Some(status) = ticket.status.and_then(TicketStatus::from_code) {
            properties.insert("status_name".to_string(), json!(status.label()));
        }
        if let Some(source) = ticket.source.and_then(TicketSource::from_code) {
            properties.insert("source_name".to_string(), json!(source.label()));
        }

        data.properties = Some(properties);
        Ok(data)
    }
}

/// Place a resolved value either at the top level or under `custom_fields`.
fn place_value(payload: &mut Map<String, Value>, service: &str, default: bool, value: Value) {
    if default {
        payload.insert(service.to_string(), value);
    } else {
        let custom = payload
            .entry("custom_fields".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = custom {
            map.insert(service.to_string(), value);
        }
    }
}

/// Lowercase snake-case conversion for flattened group keys.
fn to_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() {
                if prev_lower_or_digit {
                    out.push('_');
                }
                for lower in ch.to_lowercase() {
                    out.push(lower);
                }
                prev_lower_or_digit = false;
            } else {
                out.push(ch);
                prev_lower_or_digit = true;
            }
        } else {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower_or_digit = false;
        }
    }
    out.trim_end_matches('_').to_string()
}
