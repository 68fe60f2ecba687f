//! Connector configuration.
//!
//! Private settings are owned by the platform; they are loaded once per
//! sync agent construction and immutable for the duration of one
//! invocation.

use serde::{Deserialize, Serialize};

use hull_connector::mapping::MappingEntry;

/// Connector configuration as persisted by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivateSettings {
    /// Freshdesk subdomain (`<domain>.freshdesk.com`).
    #[serde(default)]
    pub domain: Option<String>,
    /// Freshdesk API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Segment ids whose users are synchronized to contacts.
    #[serde(default)]
    pub contact_synchronized_segments: Vec<String>,
    /// User attribute used as the email lookup key for contacts.
    #[serde(default)]
    pub contact_lookup_attribute_email: Option<String>,
    /// User attribute used as the unique external id, when configured.
    #[serde(default)]
    pub contact_lookup_attribute_unique_external_id: Option<String>,
    /// Outbound user-to-contact field mappings.
    #[serde(default)]
    pub contact_attributes_outbound: Vec<MappingEntry>,
    /// Inbound contact-to-user field mappings.
    #[serde(default)]
    pub contact_attributes_inbound: Vec<MappingEntry>,

    /// Segment ids whose accounts are synchronized to companies.
    #[serde(default)]
    pub account_synchronized_segments: Vec<String>,
    /// Account attribute used as the domain lookup key for companies.
    #[serde(default)]
    pub account_lookup_attribute_domain: Option<String>,
    /// Outbound account-to-company field mappings.
    #[serde(default)]
    pub account_attributes_outbound: Vec<MappingEntry>,
    /// Inbound company-to-account field mappings.
    #[serde(default)]
    pub account_attributes_inbound: Vec<MappingEntry>,
    /// Skip inbound companies that have no domains.
    #[serde(default)]
    pub account_filter_inbound_require_domain: bool,
}

impl PrivateSettings {
    /// Check whether API credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.domain.is_some()
    }
}
