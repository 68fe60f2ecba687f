//! User-facing status and validation messages.
//!
//! Exact wording is part of the observable contract; tests assert these
//! strings verbatim.

use hull_connector::types::ObjectKind;

/// Setting-name labels used in invalid-field warnings.
pub const SETTING_CONTACTS_INBOUND: &str = "Contacts > Incoming Fields";
pub const SETTING_CONTACTS_OUTBOUND: &str = "Contacts > Outgoing Attributes";
pub const SETTING_COMPANIES_INBOUND: &str = "Companies > Incoming Fields";
pub const SETTING_COMPANIES_OUTBOUND: &str = "Companies > Outgoing Attributes";

pub const STATUS_SETUPREQUIRED_NOAPIKEY: &str =
    "Connector unauthenticated: No API Key is present.";

pub const STATUS_SETUPREQUIRED_NODOMAIN: &str =
    "Connector unauthenticated: No domain is present.";

pub const STATUS_SETUPREQUIRED_NOLOOKUPACCTDOMAIN: &str =
    "Connector not fully configured: Domain Lookup to synchronize Accounts to Freshdesk is not specified.";

pub const STATUS_SETUPREQUIRED_NOLOOKUPCONTACTEMAIL: &str =
    "Connector not fully configured: Email Lookup to synchronize Users to Freshdesk is not specified.";

pub const VALIDATION_SKIP_CONTACT_NOEMAILLOOKUP: &str =
    "No email lookup attribute specified. Cannot synchronize contact.";

pub const VALIDATION_SKIP_ACCOUNT_NODOMAINLOOKUP: &str =
    "No domain lookup attribute specified. Cannot synchronize company.";

pub const VALIDATION_SKIP_ACCOUNT_NONAMEMAPPING: &str =
    "No name mapped, but name is mandatory in Freshdesk. Cannot synchronize company.";

pub const VALIDATION_SKIP_ACCOUNT_INBOUND_NODOMAIN: &str =
    "Company has no domains and cannot be resolved to a Hull account.";

pub const VALIDATION_SKIP_EVENT_NOIDENT: &str =
    "Ticket has no identity claims and cannot be attributed to a profile.";

/// Warning for a configured mapping referencing a nonexistent field.
#[must_use]
pub fn status_warn_field_doesnt_exist(field_name: &str, setting_name: &str) -> String {
    format!(
        "Invalid field: The Freshdesk field '{field_name}' referenced in Setting '{setting_name}' does not or no longer exist and will be ignored. Please remove or modify the corresponding mapping."
    )
}

/// Error for a failed authenticated-agent probe.
#[must_use]
pub fn status_error_authn(error_details: &str) -> String {
    format!(
        "Connector unauthenticated: Freshdesk API returned status code 401 for currently authenticated agent, please check the credentials of the connector: {error_details}"
    )
}

/// Skip note for an object outside every whitelisted segment.
#[must_use]
pub fn validation_skip_not_in_any_segment(kind: ObjectKind) -> String {
    format!(
        "Hull {kind} won't be synchronized since it is not matching any of the filtered segments."
    )
}

/// Warning note for an outbound mapping to a nonexistent service field.
///
/// `object_name` is `"contact"` or `"company"`.
#[must_use]
pub fn validation_warn_invalid_mapping_out(object_name: &str, field_name: &str) -> String {
    format!("Invalid mapping to {object_name} field '{field_name}' has been ignored.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_skip_message_is_parameterized_by_kind() {
        assert_eq!(
            validation_skip_not_in_any_segment(ObjectKind::User),
            "Hull user won't be synchronized since it is not matching any of the filtered segments."
        );
        assert_eq!(
            validation_skip_not_in_any_segment(ObjectKind::Account),
            "Hull account won't be synchronized since it is not matching any of the filtered segments."
        );
    }

    #[test]
    fn test_invalid_mapping_warning() {
        assert_eq!(
            validation_warn_invalid_mapping_out("company", "tier"),
            "Invalid mapping to company field 'tier' has been ignored."
        );
    }

    #[test]
    fn test_field_doesnt_exist_warning_names_the_setting() {
        let message = status_warn_field_doesnt_exist("tier", SETTING_COMPANIES_INBOUND);
        assert!(message.contains("'tier'"));
        assert!(message.contains("'Companies > Incoming Fields'"));
    }
}
