//! Shared connector type definitions
//!
//! Enums and status types used by every synchronization lane.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of Hull object flowing through an outgoing lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A Hull user (maps to a service contact).
    User,
    /// A Hull account (maps to a service company).
    Account,
}

impl ObjectKind {
    /// Get the string representation used in log payloads and messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::User => "user",
            ObjectKind::Account => "account",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of an outgoing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    /// Create a new object in the service.
    Insert,
    /// Update an existing object in the service.
    Update,
    /// Do not synchronize the object.
    Skip,
}

impl SyncOperation {
    /// Get the string representation used in audit log payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Insert => "insert",
            SyncOperation::Update => "update",
            SyncOperation::Skip => "skip",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of API call behind an [`crate::api_result::ApiResultObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMethod {
    /// Read or search call.
    Query,
    /// Create call.
    Insert,
    /// Update call.
    Update,
    /// Delete call.
    Delete,
}

impl ApiMethod {
    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::Query => "query",
            ApiMethod::Insert => "insert",
            ApiMethod::Update => "update",
            ApiMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of an inbound fetch job.
///
/// A job is incremental when an `updated_since` cursor was supplied,
/// otherwise it is a full fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Fetch every record the service reports.
    Full,
    /// Fetch records updated after the cursor.
    Incremental,
}

impl JobType {
    /// Get the string representation used in job log payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Full => "full",
            JobType::Incremental => "incremental",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall health status of a connector.
///
/// Statuses are mutually exclusive and ordered by severity:
/// `Error` > `SetupRequired` > `Warning` > `Ok`. Once a more severe
/// status has been set within one evaluation it is never downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConnectorStatusKind {
    /// Everything is configured and operational.
    #[default]
    #[serde(rename = "ok")]
    Ok,
    /// The connector works but has configuration warnings.
    #[serde(rename = "warning")]
    Warning,
    /// Mandatory settings are missing; operator action required.
    #[serde(rename = "setupRequired")]
    SetupRequired,
    /// The connector cannot operate (for example authentication failed).
    #[serde(rename = "error")]
    Error,
}

impl ConnectorStatusKind {
    /// Get the string representation used in status responses.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorStatusKind::Ok => "ok",
            ConnectorStatusKind::Warning => "warning",
            ConnectorStatusKind::SetupRequired => "setupRequired",
            ConnectorStatusKind::Error => "error",
        }
    }

    fn severity(self) -> u8 {
        match self {
            ConnectorStatusKind::Ok => 0,
            ConnectorStatusKind::Warning => 1,
            ConnectorStatusKind::SetupRequired => 2,
            ConnectorStatusKind::Error => 3,
        }
    }

    /// Escalate to `other` if it is more severe; never downgrade.
    pub fn escalate(&mut self, other: ConnectorStatusKind) {
        if other.severity() > self.severity() {
            *self = other;
        }
    }
}

impl fmt::Display for ConnectorStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectorStatusKind {
    type Err = ParseConnectorStatusKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(ConnectorStatusKind::Ok),
            "warning" => Ok(ConnectorStatusKind::Warning),
            "setupRequired" => Ok(ConnectorStatusKind::SetupRequired),
            "error" => Ok(ConnectorStatusKind::Error),
            _ => Err(ParseConnectorStatusKindError(s.to_string())),
        }
    }
}

/// Error parsing connector status kind from string.
#[derive(Debug, Clone)]
pub struct ParseConnectorStatusKindError(String);

impl fmt::Display for ParseConnectorStatusKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid connector status '{}', expected one of: ok, warning, setupRequired, error",
            self.0
        )
    }
}

impl std::error::Error for ParseConnectorStatusKindError {}
