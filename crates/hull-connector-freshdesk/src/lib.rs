//! # Hull / Freshdesk Connector
//!
//! Bidirectional synchronization between the Hull customer-data platform
//! and Freshdesk.
//!
//! Outgoing: Hull user and account change notifications become Freshdesk
//! contacts and companies, with segment-whitelist filtering,
//! catalogue-driven field mapping, and email/domain deduplication
//! searches before inserts. Incoming: contacts, companies and tickets
//! are fetched page by page and upserted as Hull profiles and events.
//!
//! ## Crate Organization
//!
//! - [`config`] - Connector private settings
//! - [`objects`] - Freshdesk service object types
//! - [`client`] - Freshdesk REST API client
//! - [`filter`] - Outgoing filter and re-evaluation logic
//! - [`mapping`] - Hull/Freshdesk field mapping
//! - [`validation`] - Mapping validation against live catalogues
//! - [`caching`] - Field-catalogue caching and the Redis store
//! - [`query`] - Deduplication search query construction
//! - [`messages`] - User-facing status and validation messages
//! - [`agent`] - The sync orchestrator

pub mod agent;
pub mod caching;
pub mod client;
pub mod config;
pub mod filter;
pub mod mapping;
pub mod messages;
pub mod objects;
pub mod query;
pub mod validation;

/// Prelude module for convenient imports.
///
/// ```
/// use hull_connector_freshdesk::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::SyncAgent;
    pub use crate::caching::{cache_key, CacheScenario, CachingUtil, RedisCacheStore};
    pub use crate::client::{FreshdeskClient, PER_PAGE};
    pub use crate::config::PrivateSettings;
    pub use crate::filter::FilterUtil;
    pub use crate::mapping::MappingUtil;
    pub use crate::objects::{
        FreshdeskAgent, FreshdeskCompany, FreshdeskCompanyField, FreshdeskCompanyPayload,
        FreshdeskContact, FreshdeskContactField, FreshdeskContactPayload, FreshdeskErrorBody,
        FreshdeskFieldError, FreshdeskFilterResult, FreshdeskPagedResult, FreshdeskRequester,
        FreshdeskTicket, TicketPriority, TicketSource, TicketStatus,
    };
    pub use crate::query::build_search_queries;
    pub use crate::validation::ValidationUtil;

    pub use hull_connector::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _settings = PrivateSettings::default();
        let _scenario = CacheScenario::ContactFields;
        let _kind = ObjectKind::User;
    }
}
