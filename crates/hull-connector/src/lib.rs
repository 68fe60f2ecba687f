//! # Hull Connector Framework
//!
//! Core abstractions for synchronization connectors between the Hull
//! customer-data platform and external services.
//!
//! This crate holds the service-agnostic pieces: operation envelopes,
//! uniform API result objects, inbound data types, platform notification
//! messages and the traits at the platform and cache seams. Concrete
//! connectors (for example `hull-connector-freshdesk`) build their
//! filter, mapping and orchestration logic on top of these.
//!
//! ## Crate Organization
//!
//! - [`types`] - Enums and status types
//! - [`error`] - Error types
//! - [`envelope`] - Outgoing operation envelopes and batch partitions
//! - [`api_result`] - Uniform result-or-error envelope for API calls
//! - [`incoming`] - Inbound data ready for the platform sink
//! - [`notification`] - Decoded platform change notifications
//! - [`mapping`] - Field-mapping configuration entries
//! - [`status`] - Status and metadata-fields responses
//! - [`sink`] - Platform identity/trait/event sink trait
//! - [`cache`] - Cache store trait and in-process implementation

pub mod api_result;
pub mod cache;
pub mod envelope;
pub mod error;
pub mod incoming;
pub mod mapping;
pub mod notification;
pub mod sink;
pub mod status;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use hull_connector::prelude::*;
/// ```
pub mod prelude {
    // Types and enums
    pub use crate::types::{ApiMethod, ConnectorStatusKind, JobType, ObjectKind, SyncOperation};

    // Error handling
    pub use crate::error::{ConnectorError, ConnectorResult};

    // Envelopes
    pub use crate::envelope::{OutgoingOperationEnvelope, OutgoingOperationEnvelopesFiltered};

    // API results
    pub use crate::api_result::ApiResultObject;

    // Inbound data
    pub use crate::incoming::{set_if_null, IdentClaims, IncomingData, IncomingObjectType};

    // Notifications
    pub use crate::notification::{
        get_attribute, get_service_id, HullAccountUpdateMessage, HullSegment,
        HullUserUpdateMessage,
    };

    // Mapping configuration
    pub use crate::mapping::MappingEntry;

    // Status
    pub use crate::status::{ConnectorStatusResponse, FieldsSchema, FieldsSchemaOption};

    // Seams
    pub use crate::cache::{CacheStore, MemoryCacheStore};
    pub use crate::sink::PlatformSink;
}

// Re-export async_trait for sink and cache implementors
pub use async_trait::async_trait;
