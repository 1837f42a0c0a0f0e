//! Error types for the address-list reconciler
//!
//! This module defines all error types used throughout the crate.
//! Canonicalization failures are grouped under [`ValidationError`] so callers
//! can tell bad input apart from device failures.

use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Desired-state validation failures
///
/// These are raised while canonicalizing user input and always abort before
/// any device call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entry is neither an IPv4 nor an IPv6 address
    #[error("Address {0} must be either an IPv4 or IPv6 address")]
    InvalidAddress(String),

    /// Range endpoints are of different IP versions
    #[error(
        "When specifying a range, IP addresses must be of the same type; IPv4 or IPv6. Got: {0}"
    )]
    MixedIpVersion(String),

    /// Range is not of the form `start-stop`
    #[error("Address range '{0}' must be two addresses separated by a single '-'")]
    InvalidRange(String),

    /// FQDN failed hostname validation
    #[error("The hostname '{0}' looks invalid")]
    InvalidHostname(String),

    /// Country is neither a known code nor a known country name
    #[error("Unknown country '{0}'; use a 2 character ISO code or a full country name")]
    UnknownCountry(String),

    /// List reference is not `name` or `/partition/name`
    #[error("Address list reference '{0}' must be a name or '/partition/name'")]
    InvalidListReference(String),

    /// Any other invalid input (missing name, bad partition, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Core error type for the address-list reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Desired state failed canonicalization
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Device API client failure, wrapped with context
    #[error("Device error ({client}): {message}")]
    Device {
        /// Client name
        client: String,
        /// Error message
        message: String,
    },

    /// Resource not found on load
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// The resource was still present after deletion
    #[error("Failed to delete the resource /{partition}/{name}")]
    DeletionFailed {
        /// Resource name
        name: String,
        /// Resource partition
        partition: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a device client error
    pub fn device(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Device {
            client: client.into(),
            message: message.into(),
        }
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a deletion failure for `/partition/name`
    pub fn deletion_failed(name: impl Into<String>, partition: impl Into<String>) -> Self {
        Self::DeletionFailed {
            name: name.into(),
            partition: partition.into(),
        }
    }

    /// True when the error came from canonicalizing user input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        let err: Error = ValidationError::InvalidAddress("nope".into()).into();
        assert!(err.is_validation());
        assert!(!Error::not_found("x").is_validation());
    }

    #[test]
    fn deletion_failed_names_the_resource() {
        let err = Error::deletion_failed("foo", "Common");
        assert_eq!(err.to_string(), "Failed to delete the resource /Common/foo");
    }
}
