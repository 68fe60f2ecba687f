//! Platform sink boundary.
//!
//! The identity/trait and event sinks are implemented by the platform
//! SDK; the connector only depends on this trait. Structured audit
//! events (`outgoing.user.success`, `incoming.job.start`, ...) go through
//! the same sink because the platform keys them by identity and job.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ConnectorResult;
use crate::incoming::IdentClaims;

/// Durable sink for platform profile attributes, events and audit logs.
#[async_trait]
pub trait PlatformSink: Send + Sync {
    /// Upsert user profile attributes for the given identity.
    async fn emit_user_attributes(
        &self,
        ident: &IdentClaims,
        attributes: &Map<String, Value>,
    ) -> ConnectorResult<()>;

    /// Upsert account profile attributes for the given identity.
    async fn emit_account_attributes(
        &self,
        ident: &IdentClaims,
        attributes: &Map<String, Value>,
    ) -> ConnectorResult<()>;

    /// Record a behavioral event for the given identity.
    ///
    /// The context carries a deterministic `event_id` the platform uses
    /// for deduplication on replay.
    async fn emit_user_event(
        &self,
        ident: &IdentClaims,
        event_name: &str,
        properties: &Map<String, Value>,
        context: &Map<String, Value>,
    ) -> ConnectorResult<()>;

    /// Emit a structured informational audit event.
    fn log_info(&self, event: &str, payload: Value);

    /// Emit a structured error audit event.
    fn log_error(&self, event: &str, payload: Value);
}
