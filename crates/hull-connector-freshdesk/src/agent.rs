//! Sync orchestration.
//!
//! One [`SyncAgent`] is constructed per invocation from the connector
//! settings; there is no shared mutable state between invocations. All
//! per-record writes run strictly sequentially so audit log ordering is
//! deterministic. None of the public operations return `Err` for
//! per-record or page-level problems; those are encoded in the boolean
//! result and the emitted audit logs.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};

use hull_connector::api_result::ApiResultObject;
use hull_connector::cache::CacheStore;
use hull_connector::envelope::OutgoingOperationEnvelope;
use hull_connector::error::ConnectorResult;
use hull_connector::notification::{HullAccountUpdateMessage, HullUserUpdateMessage};
use hull_connector::sink::PlatformSink;
use hull_connector::status::{ConnectorStatusResponse, FieldsSchema, FieldsSchemaOption};
use hull_connector::types::{ConnectorStatusKind, JobType, ObjectKind, SyncOperation};

use crate::caching::{cache_key, CacheScenario, CachingUtil, FIELD_CACHE_TTL_SECS};
use crate::client::{FreshdeskClient, PER_PAGE};
use crate::config::PrivateSettings;
use crate::filter::FilterUtil;
use crate::mapping::MappingUtil;
use crate::messages;
use crate::objects::{
    payload_domains, payload_email, FreshdeskCompany, FreshdeskCompanyField,
    FreshdeskCompanyPayload, FreshdeskContact, FreshdeskContactField, FreshdeskContactPayload,
};
use crate::query::build_search_queries;
use crate::validation::ValidationUtil;

/// Orchestrates the outgoing and incoming synchronization lanes.
pub struct SyncAgent {
    settings: PrivateSettings,
    sink: Arc<dyn PlatformSink>,
    caching: CachingUtil,
    connector_id: String,
    api_base: Option<String>,
}

impl SyncAgent {
    pub fn new(
        settings: PrivateSettings,
        sink: Arc<dyn PlatformSink>,
        cache: Arc<dyn CacheStore>,
        connector_id: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            sink,
            caching: CachingUtil::new(cache),
            connector_id: connector_id.into(),
            api_base: None,
        }
    }

    /// Override the service base URL. Used to point at a test server.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    fn client(&self) -> Option<ConnectorResult<FreshdeskClient>> {
        let (Some(domain), Some(api_key)) =
            (self.settings.domain.as_deref(), self.settings.api_key.as_deref())
        else {
            return None;
        };
        Some(match &self.api_base {
            Some(base) => FreshdeskClient::with_base_url(base, api_key),
            None => FreshdeskClient::new(domain, api_key),
        })
    }

    async fn contact_fields_cached(
        &self,
        client: &FreshdeskClient,
    ) -> ApiResultObject<(), Vec<FreshdeskContactField>> {
        let key = cache_key(&self.connector_id, CacheScenario::ContactFields);
        self.caching
            .get_cached_api_result(&key, || client.get_contact_fields(), FIELD_CACHE_TTL_SECS)
            .await
    }

    async fn company_fields_cached(
        &self,
        client: &FreshdeskClient,
    ) -> ApiResultObject<(), Vec<FreshdeskCompanyField>> {
        let key = cache_key(&self.connector_id, CacheScenario::CompanyFields);
        self.caching
            .get_cached_api_result(&key, || client.get_company_fields(), FIELD_CACHE_TTL_SECS)
            .await
    }

    /// Fetch both catalogues; both lanes need both for one settings
    /// context, so the cache keys stay warm for either direction.
    async fn field_catalogues(
        &self,
        client: &FreshdeskClient,
    ) -> Result<(Vec<FreshdeskContactField>, Vec<FreshdeskCompanyField>), String> {
        let contact_result = self.contact_fields_cached(client).await;
        if !contact_result.success {
            return Err(contact_result.combined_error_message());
        }
        let company_result = self.company_fields_cached(client).await;
        if !company_result.success {
            return Err(company_result.combined_error_message());
        }
        Ok((
            contact_result.data.unwrap_or_default(),
            company_result.data.unwrap_or_default(),
        ))
    }

    /// Synchronize user notifications to Freshdesk contacts.
    ///
    /// Returns `false` when the batch could not be attempted at all
    /// (missing credentials, catalogue or dedup search failure). A
    /// per-record write failure is logged and does not affect the result.
    pub async fn send_user_messages(
        &self,
        messages: Vec<HullUserUpdateMessage>,
        is_batch: bool,
    ) -> bool {
        let Some(client) = self.client() else {
            warn!("credentials incomplete, user messages not synchronized");
            return false;
        };
        debug!(count = messages.len(), is_batch, "processing user notifications");

        let filter = FilterUtil::new(&self.settings);
        let filtered = filter.filter_user_messages_initial(messages);

        for envelope in &filtered.skips {
            self.sink
                .log_info("outgoing.user.skip", json!({ "details": envelope.notes }));
        }
        if filtered.has_no_writes() {
            debug!("no user writes pending");
            return true;
        }

        let client = match client {
            Ok(client) => client,
            Err(err) => {
                self.sink
                    .log_error("outgoing.user.error", json!({ "error": err.to_string() }));
                return false;
            }
        };
        let (contact_fields, company_fields) = match self.field_catalogues(&client).await {
            Ok(catalogues) => catalogues,
            Err(error) => {
                self.sink
                    .log_error("outgoing.user.error", json!({ "error": error }));
                return false;
            }
        };
        let mapper = MappingUtil::new(&self.settings, contact_fields, company_fields);

        // Map insert candidates and run the dedup search over their emails.
        let mut insert_candidates = Vec::new();
        for mut envelope in filtered.inserts {
            mapper.map_hull_user_to_service_object(&mut envelope);
            if envelope.operation == SyncOperation::Skip {
                self.sink
                    .log_info("outgoing.user.skip", json!({ "details": envelope.notes }));
            } else {
                insert_candidates.push(envelope);
            }
        }

        let emails: Vec<String> = insert_candidates
            .iter()
            .filter_map(|e| e.service_object.as_ref().and_then(payload_email))
            .map(str::to_string)
            .collect();
        let mut matches: Vec<FreshdeskContact> = Vec::new();
        for query in build_search_queries("email", &emails) {
            let result = client.search_contacts(&query).await;
            if !result.success {
                self.sink.log_error(
                    "outgoing.user.error",
                    json!({ "error": result.combined_error_message() }),
                );
                return false;
            }
            if let Some(found) = result.data {
                matches.extend(found.results);
            }
        }

        let reevaluated =
            filter.filter_user_envelopes_to_reevaluate_for_update(insert_candidates, &matches);

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        for envelope in reevaluated {
            match envelope.operation {
                SyncOperation::Update => updates.push(envelope),
                _ => inserts.push(envelope),
            }
        }
        for mut envelope in filtered.updates {
            mapper.map_hull_user_to_service_object(&mut envelope);
            if envelope.operation == SyncOperation::Skip {
                self.sink
                    .log_info("outgoing.user.skip", json!({ "details": envelope.notes }));
            } else {
                updates.push(envelope);
            }
        }

        for envelope in inserts {
            let Some(payload) = envelope.service_object.clone() else {
                continue;
            };
            let result = client.create_contact(payload).await;
            self.handle_contact_write(&mapper, &envelope, result).await;
        }
        for envelope in updates {
            let (Some(payload), Some(id)) =
                (envelope.service_object.clone(), envelope.service_id)
            else {
                continue;
            };
            let result = client.update_contact(id, payload).await;
            self.handle_contact_write(&mapper, &envelope, result).await;
        }

        true
    }

    async fn handle_contact_write(
        &self,
        mapper: &MappingUtil,
        envelope: &OutgoingOperationEnvelope<HullUserUpdateMessage, FreshdeskContactPayload>,
        result: ApiResultObject<FreshdeskContactPayload, FreshdeskContact>,
    ) {
        if !result.success {
            self.sink.log_error(
                "outgoing.user.error",
                outgoing_error_payload(&result, envelope.operation),
            );
            return;
        }
        let Some(contact) = result.data else {
            return;
        };
        match mapper.map_service_object_to_hull_user(&contact) {
            Ok(data) => {
                if let Err(err) = self
                    .sink
                    .emit_user_attributes(&data.ident, &data.attributes)
                    .await
                {
                    self.sink
                        .log_error("outgoing.user.error", json!({ "error": err.to_string() }));
                    return;
                }
                self.sink.log_info(
                    "outgoing.user.success",
                    outgoing_success_payload(result.record, envelope),
                );
            }
            Err(err) => {
                self.sink
                    .log_error("outgoing.user.error", json!({ "error": err.to_string() }));
            }
        }
    }

    /// Synchronize account notifications to Freshdesk companies.
    pub async fn send_account_messages(
        &self,
        messages: Vec<HullAccountUpdateMessage>,
        is_batch: bool,
    ) -> bool {
        let Some(client) = self.client() else {
            warn!("credentials incomplete, account messages not synchronized");
            return false;
        };
        debug!(count = messages.len(), is_batch, "processing account notifications");

        let filter = FilterUtil::new(&self.settings);
        let filtered = filter.filter_account_messages_initial(messages);

        for envelope in &filtered.skips {
            self.sink
                .log_info("outgoing.account.skip", json!({ "details": envelope.notes }));
        }
        if filtered.has_no_writes() {
            debug!("no account writes pending");
            return true;
        }

        let client = match client {
            Ok(client) => client,
            Err(err) => {
                self.sink
                    .log_error("outgoing.account.error", json!({ "error": err.to_string() }));
                return false;
            }
        };
        let (contact_fields, company_fields) = match self.field_catalogues(&client).await {
            Ok(catalogues) => catalogues,
            Err(error) => {
                self.sink
                    .log_error("outgoing.account.error", json!({ "error": error }));
                return false;
            }
        };
        let mapper = MappingUtil::new(&self.settings, contact_fields, company_fields);

        let mut insert_candidates = Vec::new();
        for mut envelope in filtered.inserts {
            mapper.map_hull_account_to_service_object(&mut envelope);
            if envelope.operation == SyncOperation::Skip {
                self.sink
                    .log_info("outgoing.account.skip", json!({ "details": envelope.notes }));
            } else {
                insert_candidates.push(envelope);
            }
        }

        let domains: Vec<String> = insert_candidates
            .iter()
            .filter_map(|e| e.service_object.as_ref().and_then(payload_domains))
            .flatten()
            .collect();
        let mut matches: Vec<FreshdeskCompany> = Vec::new();
        for query in build_search_queries("domain", &domains) {
            let result = client.search_companies(&query).await;
            if !result.success {
                self.sink.log_error(
                    "outgoing.account.error",
                    json!({ "error": result.combined_error_message() }),
                );
                return false;
            }
            if let Some(found) = result.data {
                matches.extend(found.results);
            }
        }

        let reevaluated =
            filter.filter_account_envelopes_to_reevaluate_for_update(insert_candidates, &matches);

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        for envelope in reevaluated {
            match envelope.operation {
                SyncOperation::Update => updates.push(envelope),
                _ => inserts.push(envelope),
            }
        }
        for mut envelope in filtered.updates {
            mapper.map_hull_account_to_service_object(&mut envelope);
            if envelope.operation == SyncOperation::Skip {
                self.sink
                    .log_info("outgoing.account.skip", json!({ "details": envelope.notes }));
            } else {
                updates.push(envelope);
            }
        }

        for envelope in inserts {
            let Some(payload) = envelope.service_object.clone() else {
                continue;
            };
            let result = client.create_company(payload).await;
            self.handle_company_write(&mapper, &envelope, result).await;
        }
        for envelope in updates {
            let (Some(payload), Some(id)) =
                (envelope.service_object.clone(), envelope.service_id)
            else {
                continue;
            };
            let result = client.update_company(id, payload).await;
            self.handle_company_write(&mapper, &envelope, result).await;
        }

        true
    }

    async fn handle_company_write(
        &self,
        mapper: &MappingUtil,
        envelope: &OutgoingOperationEnvelope<HullAccountUpdateMessage, FreshdeskCompanyPayload>,
        result: ApiResultObject<FreshdeskCompanyPayload, FreshdeskCompany>,
    ) {
        if !result.success {
            self.sink.log_error(
                "outgoing.account.error",
                outgoing_error_payload(&result, envelope.operation),
            );
            return;
        }
        let Some(company) = result.data else {
            return;
        };
        match mapper.map_service_object_to_hull_account(&company) {
            Ok(data) => {
                if let Err(err) = self
                    .sink
                    .emit_account_attributes(&data.ident, &data.attributes)
                    .await
                {
                    self.sink
                        .log_error("outgoing.account.error", json!({ "error": err.to_string() }));
                    return;
                }
                self.sink.log_info(
                    "outgoing.account.success",
                    outgoing_success_payload(result.record, envelope),
                );
            }
            Err(err) => {
                self.sink
                    .log_error("outgoing.account.error", json!({ "error": err.to_string() }));
            }
        }
    }

    /// Fetch contacts and upsert them as user profiles.
    pub async fn fetch_contacts(&self, updated_since: Option<DateTime<Utc>>) -> bool {
        let object_type = "contacts";
        let job_type = job_type_for(updated_since);
        self.sink.log_info(
            "incoming.job.start",
            json!({ "objectType": object_type, "jobType": job_type.as_str() }),
        );

        let Some((client, mapper)) = self.fetch_prerequisites(object_type, job_type).await else {
            return false;
        };

        let cursor = updated_since.map(format_cursor);
        let mut page = 1;
        loop {
            let result = client.list_contacts(page, cursor.as_deref()).await;
            if !result.success {
                self.log_job_error(object_type, job_type, &result.combined_error_message());
                return false;
            }
            let Some(paged) = result.data else {
                self.log_job_error(object_type, job_type, "empty response");
                return false;
            };

            self.log_job_progress(object_type, job_type, page, paged.has_more, paged.results.len());

            for contact in &paged.results {
                let data = match mapper.map_service_object_to_hull_user(contact) {
                    Ok(data) => data,
                    Err(err) => {
                        self.log_job_error(object_type, job_type, &err.to_string());
                        return false;
                    }
                };
                if let Err(err) = self
                    .sink
                    .emit_user_attributes(&data.ident, &data.attributes)
                    .await
                {
                    self.log_job_error(object_type, job_type, &err.to_string());
                    return false;
                }
                self.sink.log_info(
                    "incoming.user.success",
                    json!({
                        "attributes": data.attributes,
                        "objectType": object_type,
                        "jobType": job_type.as_str(),
                    }),
                );
            }

            if !paged.has_more {
                break;
            }
            page += 1;
        }

        self.log_job_success(object_type, job_type);
        true
    }

    /// Fetch companies and upsert them as account profiles.
    ///
    /// Companies have no native update-time filter; incremental jobs
    /// narrow each page client-side after logging the pre-filter count.
    pub async fn fetch_companies(&self, updated_since: Option<DateTime<Utc>>) -> bool {
        let object_type = "companies";
        let job_type = job_type_for(updated_since);
        self.sink.log_info(
            "incoming.job.start",
            json!({ "objectType": object_type, "jobType": job_type.as_str() }),
        );

        let Some((client, mapper)) = self.fetch_prerequisites(object_type, job_type).await else {
            return false;
        };
        let filter = FilterUtil::new(&self.settings);

        let mut page = 1;
        loop {
            let result = client.list_companies(page).await;
            if !result.success {
                self.log_job_error(object_type, job_type, &result.combined_error_message());
                return false;
            }
            let Some(paged) = result.data else {
                self.log_job_error(object_type, job_type, "empty response");
                return false;
            };

            self.log_job_progress(object_type, job_type, page, paged.has_more, paged.results.len());

            let companies = filter.filter_companies_updated_since(paged.results, updated_since);
            for company in &companies {
                if self.settings.account_filter_inbound_require_domain
                    && company.domains().is_empty()
                {
                    self.sink.log_info(
                        "incoming.account.skip",
                        json!({
                            "details": [messages::VALIDATION_SKIP_ACCOUNT_INBOUND_NODOMAIN],
                            "objectType": object_type,
                            "jobType": job_type.as_str(),
                        }),
                    );
                    continue;
                }
                let data = match mapper.map_service_object_to_hull_account(company) {
                    Ok(data) => data,
                    Err(err) => {
                        self.log_job_error(object_type, job_type, &err.to_string());
                        return false;
                    }
                };
                if let Err(err) = self
                    .sink
                    .emit_account_attributes(&data.ident, &data.attributes)
                    .await
                {
                    self.log_job_error(object_type, job_type, &err.to_string());
                    return false;
                }
                self.sink.log_info(
                    "incoming.account.success",
                    json!({
                        "attributes": data.attributes,
                        "objectType": object_type,
                        "jobType": job_type.as_str(),
                    }),
                );
            }

            if !paged.has_more {
                break;
            }
            page += 1;
        }

        self.log_job_success(object_type, job_type);
        true
    }

    /// Fetch tickets and record them as behavioral events.
    pub async fn fetch_tickets(&self, updated_since: Option<DateTime<Utc>>) -> bool {
        let object_type = "tickets";
        let job_type = job_type_for(updated_since);
        self.sink.log_info(
            "incoming.job.start",
            json!({ "objectType": object_type, "jobType": job_type.as_str() }),
        );

        let Some((client, mapper)) = self.fetch_prerequisites(object_type, job_type).await else {
            return false;
        };

        let cursor = updated_since.map(format_cursor);
        let mut page = 1;
        loop {
            let result = client.list_tickets(page, cursor.as_deref()).await;
            if !result.success {
                self.log_job_error(object_type, job_type, &result.combined_error_message());
                return false;
            }
            let Some(paged) = result.data else {
                self.log_job_error(object_type, job_type, "empty response");
                return false;
            };

            self.log_job_progress(object_type, job_type, page, paged.has_more, paged.results.len());

            for ticket in &paged.results {
                let data = match mapper.map_ticket_to_hull_event(ticket) {
                    Ok(data) => data,
                    Err(err) => {
                        self.log_job_error(object_type, job_type, &err.to_string());
                        return false;
                    }
                };
                if data.ident.is_empty() {
                    self.sink.log_info(
                        "incoming.event.skip",
                        json!({
                            "details": [messages::VALIDATION_SKIP_EVENT_NOIDENT],
                            "objectType": object_type,
                            "jobType": job_type.as_str(),
                        }),
                    );
                    continue;
                }
                let event_name = data.event_name.as_deref().unwrap_or_default();
                let properties = data.properties.clone().unwrap_or_default();
                let context = data.context.clone().unwrap_or_default();
                if let Err(err) = self
                    .sink
                    .emit_user_event(&data.ident, event_name, &properties, &context)
                    .await
                {
                    self.log_job_error(object_type, job_type, &err.to_string());
                    return false;
                }
                self.sink.log_info(
                    "incoming.event.success",
                    json!({
                        "context": context,
                        "properties": properties,
                        "objectType": object_type,
                        "jobType": job_type.as_str(),
                    }),
                );
            }

            if !paged.has_more {
                break;
            }
            page += 1;
        }

        self.log_job_success(object_type, job_type);
        true
    }

    /// Evaluate connector health in strict severity order.
    pub async fn determine_connector_status(&self) -> ConnectorStatusResponse {
        let mut status = ConnectorStatusKind::Ok;
        let mut status_messages = Vec::new();

        if self.settings.api_key.is_none() {
            status.escalate(ConnectorStatusKind::SetupRequired);
            status_messages.push(messages::STATUS_SETUPREQUIRED_NOAPIKEY.to_string());
        }
        if self.settings.domain.is_none() {
            status.escalate(ConnectorStatusKind::SetupRequired);
            status_messages.push(messages::STATUS_SETUPREQUIRED_NODOMAIN.to_string());
        }
        if self.settings.contact_lookup_attribute_email.is_none() {
            status.escalate(ConnectorStatusKind::SetupRequired);
            status_messages.push(messages::STATUS_SETUPREQUIRED_NOLOOKUPCONTACTEMAIL.to_string());
        }
        if self.settings.account_lookup_attribute_domain.is_none() {
            status.escalate(ConnectorStatusKind::SetupRequired);
            status_messages.push(messages::STATUS_SETUPREQUIRED_NOLOOKUPACCTDOMAIN.to_string());
        }

        if status != ConnectorStatusKind::Ok {
            return ConnectorStatusResponse {
                status,
                messages: status_messages,
            };
        }

        let client = match self.client() {
            Some(Ok(client)) => client,
            Some(Err(err)) => {
                return ConnectorStatusResponse {
                    status: ConnectorStatusKind::Error,
                    messages: vec![err.to_string()],
                }
            }
            // Unreachable given the prerequisite checks above.
            None => {
                return ConnectorStatusResponse {
                    status: ConnectorStatusKind::SetupRequired,
                    messages: status_messages,
                }
            }
        };

        let agent_probe = client.get_current_agent().await;
        if !agent_probe.success {
            status.escalate(ConnectorStatusKind::Error);
            status_messages.push(messages::status_error_authn(
                &agent_probe.combined_error_message(),
            ));
            return ConnectorStatusResponse {
                status,
                messages: status_messages,
            };
        }

        let validator = ValidationUtil::new(&self.settings);
        let contact_result = self.contact_fields_cached(&client).await;
        match contact_result.data {
            Some(fields) if contact_result.success => {
                let warnings = validator.validate_contact_fields(&fields);
                if !warnings.is_empty() {
                    status.escalate(ConnectorStatusKind::Warning);
                    status_messages.extend(warnings);
                }
            }
            _ => {
                status.escalate(ConnectorStatusKind::Warning);
                status_messages.push(contact_result.combined_error_message());
            }
        }
        let company_result = self.company_fields_cached(&client).await;
        match company_result.data {
            Some(fields) if company_result.success => {
                let warnings = validator.validate_company_fields(&fields);
                if !warnings.is_empty() {
                    status.escalate(ConnectorStatusKind::Warning);
                    status_messages.extend(warnings);
                }
            }
            _ => {
                status.escalate(ConnectorStatusKind::Warning);
                status_messages.push(company_result.combined_error_message());
            }
        }

        ConnectorStatusResponse {
            status,
            messages: status_messages,
        }
    }

    /// Selectable service fields for the settings pickers, served from
    /// the cached catalogues.
    pub async fn get_metadata_fields(&self, kind: ObjectKind) -> FieldsSchema {
        let client = match self.client() {
            Some(Ok(client)) => client,
            Some(Err(err)) => return FieldsSchema::error(err.to_string()),
            None => return FieldsSchema::error(messages::STATUS_SETUPREQUIRED_NOAPIKEY),
        };

        match kind {
            ObjectKind::User => {
                let result = self.contact_fields_cached(&client).await;
                if !result.success {
                    return FieldsSchema::error(result.combined_error_message());
                }
                FieldsSchema::from_options(
                    result
                        .data
                        .unwrap_or_default()
                        .into_iter()
                        .map(|f| FieldsSchemaOption {
                            value: f.name,
                            label: f.label,
                        })
                        .collect(),
                )
            }
            ObjectKind::Account => {
                let result = self.company_fields_cached(&client).await;
                if !result.success {
                    return FieldsSchema::error(result.combined_error_message());
                }
                FieldsSchema::from_options(
                    result
                        .data
                        .unwrap_or_default()
                        .into_iter()
                        .map(|f| FieldsSchemaOption {
                            value: f.name,
                            label: f.label,
                        })
                        .collect(),
                )
            }
        }
    }

    /// Shared guard for the fetch jobs: credentials plus both catalogues.
    async fn fetch_prerequisites(
        &self,
        object_type: &str,
        job_type: JobType,
    ) -> Option<(FreshdeskClient, MappingUtil)> {
        let client = match self.client() {
            Some(Ok(client)) => client,
            Some(Err(err)) => {
                self.log_job_error(object_type, job_type, &err.to_string());
                return None;
            }
            None => {
                self.log_job_error(object_type, job_type, "credentials incomplete");
                return None;
            }
        };
        match self.field_catalogues(&client).await {
            Ok((contact_fields, company_fields)) => {
                let mapper = MappingUtil::new(&self.settings, contact_fields, company_fields);
                Some((client, mapper))
            }
            Err(error) => {
                self.log_job_error(object_type, job_type, &error);
                None
            }
        }
    }

    fn log_job_progress(
        &self,
        object_type: &str,
        job_type: JobType,
        page: u32,
        has_more: bool,
        count: usize,
    ) {
        self.sink.log_info(
            "incoming.job.progress",
            json!({
                "objectType": object_type,
                "jobType": job_type.as_str(),
                "page": page,
                "perPage": PER_PAGE,
                "hasMore": has_more,
                "count": count,
            }),
        );
    }

    fn log_job_success(&self, object_type: &str, job_type: JobType) {
        self.sink.log_info(
            "incoming.job.success",
            json!({ "objectType": object_type, "jobType": job_type.as_str() }),
        );
    }

    fn log_job_error(&self, object_type: &str, job_type: JobType, error: &str) {
        self.sink.log_error(
            "incoming.job.error",
            json!({
                "objectType": object_type,
                "jobType": job_type.as_str(),
                "error": error,
            }),
        );
    }
}

fn job_type_for(updated_since: Option<DateTime<Utc>>) -> JobType {
    if updated_since.is_some() {
        JobType::Incremental
    } else {
        JobType::Full
    }
}

fn format_cursor(updated_since: DateTime<Utc>) -> String {
    updated_since.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn outgoing_success_payload<M, S: serde::Serialize>(
    record: Option<S>,
    envelope: &OutgoingOperationEnvelope<M, S>,
) -> Value {
    let mut payload = json!({
        "data": record,
        "operation": envelope.operation.as_str(),
    });
    if !envelope.notes.is_empty() {
        payload["details"] = json!(envelope.notes);
    }
    payload
}

fn outgoing_error_payload<R: serde::Serialize, D>(
    result: &ApiResultObject<R, D>,
    operation: SyncOperation,
) -> Value {
    json!({
        "data": result.record,
        "operation": operation.as_str(),
        "error": result.combined_error_message(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_for_cursor() {
        assert_eq!(job_type_for(None), JobType::Full);
        let cursor = DateTime::parse_from_rfc3339("2020-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(job_type_for(Some(cursor)), JobType::Incremental);
    }

    #[test]
    fn test_cursor_format_uses_utc_z_suffix() {
        let cursor = DateTime::parse_from_rfc3339("2020-06-01T12:30:00+02:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_cursor(cursor), "2020-06-01T10:30:00Z");
    }

    #[test]
    fn test_success_payload_omits_empty_details() {
        let envelope: OutgoingOperationEnvelope<(), Value> =
            OutgoingOperationEnvelope::insert(());
        let payload = outgoing_success_payload(Some(json!({ "email": "a@b.io" })), &envelope);
        assert_eq!(payload["operation"], "insert");
        assert_eq!(payload["data"]["email"], "a@b.io");
        assert!(payload.get("details").is_none());

        let mut envelope: OutgoingOperationEnvelope<(), Value> =
            OutgoingOperationEnvelope::insert(());
        envelope.add_note("something");
        let payload = outgoing_success_payload(None::<Value>, &envelope);
        assert_eq!(payload["details"], json!(["something"]));
    }
}
