//! Outgoing filter logic.
//!
//! Decides, per notification message, whether a record is inserted,
//! updated or skipped, and re-evaluates insert candidates against
//! deduplication lookups.

use chrono::{DateTime, Utc};

use hull_connector::envelope::{OutgoingOperationEnvelope, OutgoingOperationEnvelopesFiltered};
use hull_connector::notification::{
    get_service_id, HullAccountUpdateMessage, HullSegment, HullUserUpdateMessage,
};
use hull_connector::types::{ObjectKind, SyncOperation};

use crate::config::PrivateSettings;
use crate::messages;
use crate::objects::{
    payload_domains, payload_email, FreshdeskCompany, FreshdeskCompanyPayload, FreshdeskContact,
    FreshdeskContactPayload,
};

/// Attribute path holding the linked contact id on a Hull user.
const USER_SERVICE_ID_PATH: &str = "traits_freshdesk/id";

/// Attribute path holding the linked company id on a Hull account.
const ACCOUNT_SERVICE_ID_PATH: &str = "freshdesk/id";

/// Partitions notification messages into operation envelopes.
#[derive(Debug, Clone)]
pub struct FilterUtil {
    contact_segments: Vec<String>,
    account_segments: Vec<String>,
}

impl FilterUtil {
    #[must_use]
    pub fn new(settings: &PrivateSettings) -> Self {
        Self {
            contact_segments: settings.contact_synchronized_segments.clone(),
            account_segments: settings.account_synchronized_segments.clone(),
        }
    }

    /// Initial partition of user notifications.
    ///
    /// Users outside every whitelisted segment are skipped; users already
    /// linked to a contact become updates, everyone else an insert
    /// candidate.
    #[must_use]
    pub fn filter_user_messages_initial(
        &self,
        messages: Vec<HullUserUpdateMessage>,
    ) -> OutgoingOperationEnvelopesFiltered<HullUserUpdateMessage, FreshdeskContactPayload> {
        let mut filtered = OutgoingOperationEnvelopesFiltered::default();

        for message in messages {
            if !in_any_segment(&message.segments, &self.contact_segments) {
                filtered.skips.push(OutgoingOperationEnvelope::skip(
                    message,
                    vec![messages::validation_skip_not_in_any_segment(ObjectKind::User)],
                ));
                continue;
            }

            match get_service_id(&message.user, USER_SERVICE_ID_PATH) {
                Some(id) => filtered
                    .updates
                    .push(OutgoingOperationEnvelope::update(message, id)),
                None => filtered.inserts.push(OutgoingOperationEnvelope::insert(message)),
            }
        }

        filtered
    }

    /// Initial partition of account notifications.
    #[must_use]
    pub fn filter_account_messages_initial(
        &self,
        messages: Vec<HullAccountUpdateMessage>,
    ) -> OutgoingOperationEnvelopesFiltered<HullAccountUpdateMessage, FreshdeskCompanyPayload> {
        let mut filtered = OutgoingOperationEnvelopesFiltered::default();

        for message in messages {
            if !in_any_segment(&message.account_segments, &self.account_segments) {
                filtered.skips.push(OutgoingOperationEnvelope::skip(
                    message,
                    vec![messages::validation_skip_not_in_any_segment(
                        ObjectKind::Account,
                    )],
                ));
                continue;
            }

            match get_service_id(&message.account, ACCOUNT_SERVICE_ID_PATH) {
                Some(id) => filtered
                    .updates
                    .push(OutgoingOperationEnvelope::update(message, id)),
                None => filtered.inserts.push(OutgoingOperationEnvelope::insert(message)),
            }
        }

        filtered
    }

    /// Re-evaluate insert candidates against contacts found by the
    /// deduplication search.
    ///
    /// Candidates whose lookup email matches an existing contact turn
    /// into updates against that contact. Candidates with no mapped
    /// payload or no email are dropped; they can never be written.
    #[must_use]
    pub fn filter_user_envelopes_to_reevaluate_for_update(
        &self,
        envelopes: Vec<OutgoingOperationEnvelope<HullUserUpdateMessage, FreshdeskContactPayload>>,
        existing: &[FreshdeskContact],
    ) -> Vec<OutgoingOperationEnvelope<HullUserUpdateMessage, FreshdeskContactPayload>> {
        let mut reevaluated = Vec::new();

        for mut envelope in envelopes {
            let email = match envelope.service_object.as_ref().and_then(payload_email) {
                Some(email) => email.to_string(),
                None => continue,
            };

            let matched = existing
                .iter()
                .find(|contact| contact.email.as_deref() == Some(email.as_str()));

            if let Some(contact) = matched {
                envelope.operation = SyncOperation::Update;
                envelope.service_id = Some(contact.id);
            }
            reevaluated.push(envelope);
        }

        reevaluated
    }

    /// Re-evaluate insert candidates against companies found by the
    /// deduplication search, matched on any shared domain.
    #[must_use]
    pub fn filter_account_envelopes_to_reevaluate_for_update(
        &self,
        envelopes: Vec<
            OutgoingOperationEnvelope<HullAccountUpdateMessage, FreshdeskCompanyPayload>,
        >,
        existing: &[FreshdeskCompany],
    ) -> Vec<OutgoingOperationEnvelope<HullAccountUpdateMessage, FreshdeskCompanyPayload>> {
        let mut reevaluated = Vec::new();

        for mut envelope in envelopes {
            let domains = match envelope.service_object.as_ref().and_then(payload_domains) {
                Some(domains) if !domains.is_empty() => domains,
                _ => continue,
            };

            let matched = existing.iter().find(|company| {
                company
                    .domains()
                    .iter()
                    .any(|candidate| domains.contains(candidate))
            });

            if let Some(company) = matched {
                envelope.operation = SyncOperation::Update;
                envelope.service_id = Some(company.id);
            }
            reevaluated.push(envelope);
        }

        reevaluated
    }

    /// Narrow a company page to records updated strictly after the
    /// threshold. Companies with unparseable timestamps are dropped when
    /// a threshold is in effect.
    #[must_use]
    pub fn filter_companies_updated_since(
        &self,
        companies: Vec<FreshdeskCompany>,
        threshold: Option<DateTime<Utc>>,
    ) -> Vec<FreshdeskCompany> {
        let Some(threshold) = threshold else {
            return companies;
        };

        companies
            .into_iter()
            .filter(|company| {
                DateTime::parse_from_rfc3339(&company.updated_at)
                    .map(|updated| updated.with_timezone(&Utc) > threshold)
                    .unwrap_or(false)
            })
            .collect()
    }
}

fn in_any_segment(segments: &[HullSegment], whitelist: &[String]) -> bool {
    segments.iter().any(|s| whitelist.contains(&s.id))
}
