//! Mapping validation against the live field catalogues.
//!
//! Produces the warning strings surfaced by status determination when a
//! configured mapping references a field that no longer exists. Inbound
//! mappings are checked before outbound ones; the order is reflected in
//! the status messages.

use hull_connector::mapping::MappingEntry;

use crate::config::PrivateSettings;
use crate::messages;
use crate::objects::{FreshdeskCompanyField, FreshdeskContactField};

/// Validates configured mappings against live catalogues.
#[derive(Debug, Clone)]
pub struct ValidationUtil {
    settings: PrivateSettings,
}

impl ValidationUtil {
    #[must_use]
    pub fn new(settings: &PrivateSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    /// Check contact mappings, inbound then outbound.
    #[must_use]
    pub fn validate_contact_fields(&self, fields: &[FreshdeskContactField]) -> Vec<String> {
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        let mut warnings = collect_unknown(
            &self.settings.contact_attributes_inbound,
            &names,
            messages::SETTING_CONTACTS_INBOUND,
        );
        warnings.extend(collect_unknown(
            &self.settings.contact_attributes_outbound,
            &names,
            messages::SETTING_CONTACTS_OUTBOUND,
        ));
        warnings
    }

    /// Check company mappings, inbound then outbound.
    #[must_use]
    pub fn validate_company_fields(&self, fields: &[FreshdeskCompanyField]) -> Vec<String> {
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        let mut warnings = collect_unknown(
            &self.settings.account_attributes_inbound,
            &names,
            messages::SETTING_COMPANIES_INBOUND,
        );
        warnings.extend(collect_unknown(
            &self.settings.account_attributes_outbound,
            &names,
            messages::SETTING_COMPANIES_OUTBOUND,
        ));
        warnings
    }
}

fn collect_unknown(entries: &[MappingEntry], names: &[&str], setting_name: &str) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.service.as_deref())
        .filter(|service| !names.contains(service))
        .map(|service| messages::status_warn_field_doesnt_exist(service, setting_name))
        .collect()
}
