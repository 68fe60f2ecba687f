//! Connector error types
//!
//! Error definitions shared by every synchronization lane. Per-record
//! mapping problems are not errors in this taxonomy; they travel as notes
//! on the envelope instead.

use thiserror::Error;

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Connector configuration is incomplete or invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Authentication against the service failed.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Network error while calling the service.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service rejected an API call.
    #[error("api error: {message}")]
    Api { message: String },

    /// Failure while writing to the platform sink.
    #[error("platform sink error: {message}")]
    Sink { message: String },

    /// Cache backend failure. Always treated as non-fatal by callers.
    #[error("cache error: {message}")]
    Cache { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ConnectorError {
    /// Create an invalid-configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a network error with an underlying source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        ConnectorError::Cache {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
