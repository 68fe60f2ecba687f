//! End-to-end orchestration scenarios against a mock Freshdesk server.
//!
//! A recording sink captures every audit log and platform write so the
//! tests can assert exact event names, payload shapes and ordering.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hull_connector::async_trait;
use hull_connector::cache::MemoryCacheStore;
use hull_connector::error::ConnectorResult;
use hull_connector::incoming::IdentClaims;
use hull_connector::mapping::MappingEntry;
use hull_connector::notification::{HullSegment, HullUserUpdateMessage};
use hull_connector::sink::PlatformSink;
use hull_connector::types::ConnectorStatusKind;
use hull_connector_freshdesk::agent::SyncAgent;
use hull_connector_freshdesk::config::PrivateSettings;

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Default)]
struct RecordingSink {
    logs: Mutex<Vec<(String, String, Value)>>,
    user_attributes: Mutex<Vec<(IdentClaims, Map<String, Value>)>>,
    account_attributes: Mutex<Vec<(IdentClaims, Map<String, Value>)>>,
    events: Mutex<Vec<(IdentClaims, String)>>,
}

impl RecordingSink {
    fn logs(&self) -> Vec<(String, String, Value)> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformSink for RecordingSink {
    async fn emit_user_attributes(
        &self,
        ident: &IdentClaims,
        attributes: &Map<String, Value>,
    ) -> ConnectorResult<()> {
        self.user_attributes
            .lock()
            .unwrap()
            .push((ident.clone(), attributes.clone()));
        Ok(())
    }

    async fn emit_account_attributes(
        &self,
        ident: &IdentClaims,
        attributes: &Map<String, Value>,
    ) -> ConnectorResult<()> {
        self.account_attributes
            .lock()
            .unwrap()
            .push((ident.clone(), attributes.clone()));
        Ok(())
    }

    async fn emit_user_event(
        &self,
        ident: &IdentClaims,
        event_name: &str,
        _properties: &Map<String, Value>,
        _context: &Map<String, Value>,
    ) -> ConnectorResult<()> {
        self.events
            .lock()
            .unwrap()
            .push((ident.clone(), event_name.to_string()));
        Ok(())
    }

    fn log_info(&self, event: &str, payload: Value) {
        self.logs
            .lock()
            .unwrap()
            .push(("info".to_string(), event.to_string(), payload));
    }

    fn log_error(&self, event: &str, payload: Value) {
        self.logs
            .lock()
            .unwrap()
            .push(("error".to_string(), event.to_string(), payload));
    }
}

fn agent_for(server: &MockServer, settings: PrivateSettings, sink: Arc<RecordingSink>) -> SyncAgent {
    SyncAgent::new(
        settings,
        sink,
        Arc::new(MemoryCacheStore::new()),
        "connector-1",
    )
    .with_api_base(server.uri())
}

fn contact_settings() -> PrivateSettings {
    PrivateSettings {
        domain: Some("hulltest".to_string()),
        api_key: Some("test-key".to_string()),
        contact_synchronized_segments: vec!["segment-users".to_string()],
        contact_lookup_attribute_email: Some("email".to_string()),
        contact_attributes_outbound: vec![MappingEntry::new("name", "name")],
        contact_attributes_inbound: vec![MappingEntry::new("traits_freshdesk/name", "name")],
        account_synchronized_segments: vec!["segment-accounts".to_string()],
        account_lookup_attribute_domain: Some("domain".to_string()),
        account_attributes_inbound: vec![
            MappingEntry::new("freshdesk/name", "name"),
            MappingEntry::new("freshdesk/description", "description"),
        ],
        ..Default::default()
    }
}

fn user_message(segment: &str, user: Value) -> HullUserUpdateMessage {
    HullUserUpdateMessage {
        user,
        account: Value::Null,
        segments: vec![HullSegment {
            id: segment.to_string(),
            name: format!("Segment {segment}"),
        }],
        changes: None,
    }
}

async fn mount_catalogues(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/contact_fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "name", "label": "Name", "default": true },
            { "id": 2, "name": "email", "label": "Email", "default": true }
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company_fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "name", "label": "Name", "default": true },
            { "id": 2, "name": "description", "label": "Description", "default": true }
        ])))
        .mount(server)
        .await;
}

fn cursor(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

// =============================================================================
// Outgoing users
// =============================================================================

#[tokio::test]
async fn test_user_insert_emits_single_success_log() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/search/contacts"))
        .and(query_param("query", "\"email:'jane@hull.io'\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(body_json(json!({ "email": "jane@hull.io", "name": "Jane Smith" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 23,
            "email": "jane@hull.io",
            "name": "Jane Smith",
            "created_at": "2020-06-01T00:00:00Z",
            "updated_at": "2020-06-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    let message = user_message(
        "segment-users",
        json!({ "name": "Jane Smith", "email": "jane@hull.io" }),
    );
    assert!(agent.send_user_messages(vec![message], false).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 1);
    let (level, event, payload) = &logs[0];
    assert_eq!(level, "info");
    assert_eq!(event, "outgoing.user.success");
    assert_eq!(payload["operation"], "insert");
    assert_eq!(payload["data"]["email"], "jane@hull.io");
    assert_eq!(payload["data"]["name"], "Jane Smith");
    assert!(payload.get("details").is_none());

    // The created contact was reverse-mapped into a platform write.
    let writes = sink.user_attributes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    let (ident, attributes) = &writes[0];
    assert_eq!(ident.email.as_deref(), Some("jane@hull.io"));
    assert_eq!(ident.anonymous_id.as_deref(), Some("freshdesk:23"));
    assert_eq!(
        attributes.get("freshdesk/id"),
        Some(&json!({ "value": 23, "operation": "setIfNull" }))
    );
}

#[tokio::test]
async fn test_user_dedup_match_turns_insert_into_update() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/search/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "results": [
                { "id": 23, "email": "jane@hull.io", "created_at": "2020-06-01T00:00:00Z", "updated_at": "2020-06-01T00:00:00Z" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/contacts/23"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 23,
            "email": "jane@hull.io",
            "name": "Jane Smith",
            "created_at": "2020-06-01T00:00:00Z",
            "updated_at": "2020-06-02T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    let message = user_message(
        "segment-users",
        json!({ "name": "Jane Smith", "email": "jane@hull.io" }),
    );
    assert!(agent.send_user_messages(vec![message], false).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].1, "outgoing.user.success");
    assert_eq!(logs[0].2["operation"], "update");
}

#[tokio::test]
async fn test_user_outside_segments_is_skipped_without_network() {
    let server = MockServer::start().await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    let message = user_message("segment-other", json!({ "email": "jane@hull.io" }));
    assert!(agent.send_user_messages(vec![message], false).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].1, "outgoing.user.skip");
    assert_eq!(
        logs[0].2,
        json!({
            "details": ["Hull user won't be synchronized since it is not matching any of the filtered segments."]
        })
    );
    assert!(sink.user_attributes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_replay_still_applies_segment_whitelist() {
    let server = MockServer::start().await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    let message = user_message("segment-other", json!({ "email": "jane@hull.io" }));
    assert!(agent.send_user_messages(vec![message], true).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].1, "outgoing.user.skip");
    assert_eq!(
        logs[0].2,
        json!({
            "details": ["Hull user won't be synchronized since it is not matching any of the filtered segments."]
        })
    );
    assert!(sink.user_attributes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_write_failure_does_not_abort_batch() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/search/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "results": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(body_json(json!({ "email": "bad@hull.io" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "description": "Validation failed",
            "errors": [{ "field": "email", "message": "Email is invalid", "code": "invalid_value" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(body_json(json!({ "email": "good@hull.io" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "email": "good@hull.io",
            "created_at": "2020-06-01T00:00:00Z",
            "updated_at": "2020-06-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    let messages = vec![
        user_message("segment-users", json!({ "email": "bad@hull.io" })),
        user_message("segment-users", json!({ "email": "good@hull.io" })),
    ];
    assert!(agent.send_user_messages(messages, false).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].1, "outgoing.user.error");
    assert_eq!(
        logs[0].2["error"],
        "Request failed with status code 400 Validation failed Email is invalid"
    );
    assert_eq!(logs[1].1, "outgoing.user.success");
    assert_eq!(logs[1].2["data"]["email"], "good@hull.io");
}

// =============================================================================
// Incoming contacts
// =============================================================================

#[tokio::test]
async fn test_contact_fetch_incremental_single_page() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(query_param("page", "1"))
        .and(query_param("_updated_since", "2020-06-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 23,
                "name": "Jane Smith",
                "email": "jane@hull.io",
                "created_at": "2020-06-01T00:00:00Z",
                "updated_at": "2020-06-02T00:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    assert!(agent.fetch_contacts(Some(cursor("2020-06-01T00:00:00Z"))).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[0].1, "incoming.job.start");
    assert_eq!(
        logs[0].2,
        json!({ "objectType": "contacts", "jobType": "incremental" })
    );
    assert_eq!(logs[1].1, "incoming.job.progress");
    assert_eq!(
        logs[1].2,
        json!({
            "objectType": "contacts",
            "jobType": "incremental",
            "page": 1,
            "perPage": 100,
            "hasMore": false,
            "count": 1
        })
    );
    assert_eq!(logs[2].1, "incoming.user.success");
    assert_eq!(
        logs[2].2["attributes"],
        json!({
            "freshdesk/name": "Jane Smith",
            "freshdesk/email": "jane@hull.io",
            "freshdesk/id": { "value": 23, "operation": "setIfNull" }
        })
    );
    assert_eq!(logs[3].1, "incoming.job.success");
}

// =============================================================================
// Incoming companies
// =============================================================================

#[tokio::test]
async fn test_company_fetch_page_error_fails_fast() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", "<https://x.test/companies?page=2>; rel=\"next\"")
                .set_body_json(json!([
                    {
                        "id": 1,
                        "name": "Company A",
                        "description": "First",
                        "domains": ["a.io"],
                        "created_at": "2020-06-01T00:00:00Z",
                        "updated_at": "2020-06-01T00:00:00Z"
                    },
                    {
                        "id": 2,
                        "name": "Company B",
                        "description": "Second",
                        "domains": ["b.io"],
                        "created_at": "2020-06-01T00:00:00Z",
                        "updated_at": "2020-06-01T00:00:00Z"
                    }
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "description": "Something went wrong" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    assert!(!agent.fetch_companies(None).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 5);
    assert_eq!(logs[0].1, "incoming.job.start");
    assert_eq!(
        logs[0].2,
        json!({ "objectType": "companies", "jobType": "full" })
    );
    assert_eq!(logs[1].1, "incoming.job.progress");
    assert_eq!(logs[1].2["hasMore"], true);
    assert_eq!(logs[1].2["count"], 2);
    assert_eq!(logs[2].1, "incoming.account.success");
    assert_eq!(
        logs[2].2["attributes"],
        json!({
            "freshdesk/name": "Company A",
            "freshdesk/description": "First",
            "freshdesk/domains": ["a.io"],
            "freshdesk/id": { "value": 1, "operation": "setIfNull" }
        })
    );
    assert_eq!(logs[3].1, "incoming.account.success");
    assert_eq!(logs[4].0, "error");
    assert_eq!(logs[4].1, "incoming.job.error");
    assert_eq!(
        logs[4].2,
        json!({
            "objectType": "companies",
            "jobType": "full",
            "error": "Request failed with status code 500 Something went wrong"
        })
    );
    // Fail-fast: no job-success log after the page error.
    assert!(logs.iter().all(|(_, event, _)| event != "incoming.job.success"));
}

#[tokio::test]
async fn test_company_fetch_incremental_filters_client_side() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "Stale",
                "domains": ["stale.io"],
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-01-01T00:00:00Z"
            },
            {
                "id": 2,
                "name": "Fresh",
                "domains": ["fresh.io"],
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-06-02T00:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    assert!(agent.fetch_companies(Some(cursor("2020-06-01T00:00:00Z"))).await);

    let logs = sink.logs();
    // Progress reports the pre-filter count; only the fresh record lands.
    assert_eq!(logs[1].2["count"], 2);
    let successes: Vec<_> = logs
        .iter()
        .filter(|(_, event, _)| event == "incoming.account.success")
        .collect();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].2["attributes"]["freshdesk/name"], "Fresh");
}

#[tokio::test]
async fn test_company_fetch_skips_domainless_when_required() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "No Domains",
                "created_at": "2020-06-01T00:00:00Z",
                "updated_at": "2020-06-01T00:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let settings = PrivateSettings {
        account_filter_inbound_require_domain: true,
        ..contact_settings()
    };
    let agent = agent_for(&server, settings, sink.clone());

    assert!(agent.fetch_companies(None).await);

    let logs = sink.logs();
    assert_eq!(logs[2].1, "incoming.account.skip");
    assert_eq!(
        logs[2].2["details"],
        json!(["Company has no domains and cannot be resolved to a Hull account."])
    );
    assert!(sink.account_attributes.lock().unwrap().is_empty());
}

// =============================================================================
// Incoming tickets
// =============================================================================

#[tokio::test]
async fn test_ticket_fetch_emits_events_and_skips_unattributable() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 18,
                "requester_id": 5,
                "requester": { "id": 5, "email": "requester@hull.io" },
                "priority": 1,
                "status": 2,
                "source": 2,
                "subject": "Please help",
                "created_at": "2015-08-17T12:02:50Z",
                "updated_at": "2015-08-17T12:02:51Z"
            },
            {
                "id": 19,
                "requester_id": null,
                "created_at": "2015-08-17T12:02:50Z",
                "updated_at": "2015-08-17T12:02:50Z"
            }
        ])))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink.clone());

    assert!(agent.fetch_tickets(Some(cursor("2015-08-01T00:00:00Z"))).await);

    let logs = sink.logs();
    assert_eq!(logs.len(), 5);
    assert_eq!(logs[0].1, "incoming.job.start");
    assert_eq!(
        logs[0].2,
        json!({ "objectType": "tickets", "jobType": "incremental" })
    );
    assert_eq!(logs[2].1, "incoming.event.success");
    assert_eq!(logs[2].2["context"]["source"], "freshdesk");
    assert_eq!(logs[2].2["context"]["event_id"], "fd-18-2015-08-17T12:02:51Z");
    assert_eq!(logs[2].2["properties"]["id"], 18);
    assert_eq!(logs[2].2["properties"]["priority_name"], "Low");
    assert_eq!(logs[3].1, "incoming.event.skip");
    assert_eq!(logs[4].1, "incoming.job.success");

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0.email.as_deref(), Some("requester@hull.io"));
    assert_eq!(events[0].1, "Ticket updated");
}

// =============================================================================
// Status determination
// =============================================================================

#[tokio::test]
async fn test_status_collects_all_missing_prerequisites() {
    let server = MockServer::start().await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, PrivateSettings::default(), sink);

    let status = agent.determine_connector_status().await;
    assert_eq!(status.status, ConnectorStatusKind::SetupRequired);
    assert_eq!(
        status.messages,
        vec![
            "Connector unauthenticated: No API Key is present.".to_string(),
            "Connector unauthenticated: No domain is present.".to_string(),
            "Connector not fully configured: Email Lookup to synchronize Users to Freshdesk is not specified.".to_string(),
            "Connector not fully configured: Domain Lookup to synchronize Accounts to Freshdesk is not specified.".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_status_reports_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agents/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "description": "authentication failure" })),
        )
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink);

    let status = agent.determine_connector_status().await;
    assert_eq!(status.status, ConnectorStatusKind::Error);
    assert_eq!(status.messages.len(), 1);
    assert!(status.messages[0].starts_with("Connector unauthenticated:"));
    assert!(status.messages[0]
        .contains("Request failed with status code 401 authentication failure"));
}

#[tokio::test]
async fn test_status_warns_on_invalid_mapping() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/agents/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 77 })))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let settings = PrivateSettings {
        account_attributes_outbound: vec![MappingEntry::new("name", "tier")],
        ..contact_settings()
    };
    let agent = agent_for(&server, settings, sink);

    let status = agent.determine_connector_status().await;
    assert_eq!(status.status, ConnectorStatusKind::Warning);
    assert_eq!(status.messages.len(), 1);
    assert!(status.messages[0].contains("'tier'"));
    assert!(status.messages[0].contains("'Companies > Outgoing Attributes'"));
}

#[tokio::test]
async fn test_status_ok_with_valid_configuration() {
    let server = MockServer::start().await;
    mount_catalogues(&server).await;

    Mock::given(method("GET"))
        .and(path("/agents/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 77 })))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let agent = agent_for(&server, contact_settings(), sink);

    let status = agent.determine_connector_status().await;
    assert_eq!(status.status, ConnectorStatusKind::Ok);
    assert!(status.messages.is_empty());
}
