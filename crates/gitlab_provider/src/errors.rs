//! Error types for provider operations.
//!
//! Errors fall into three groups:
//! - malformed local identity or configuration, which is fatal and reported immediately
//! - cancellation of an in-flight operation by the caller
//! - remote failures, which wrap [`gitlab_client::Error`] verbatim
//!
//! A remote "not found" during a read is not an error at all; the resource is reported as
//! absent instead.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An attribute holds a value of the wrong type.
    #[error("Attribute '{name}' must be a {expected}")]
    AttributeType {
        name: String,
        expected: &'static str,
    },

    /// The operation was cancelled by the caller before it completed.
    #[error("Operation was cancelled")]
    Cancelled,

    /// The remote API call failed.
    #[error(transparent)]
    Client(#[from] gitlab_client::Error),

    /// An import key did not have the expected shape.
    #[error("Invalid {resource} import format; expected '{expected}', got '{key}'")]
    InvalidImportId {
        resource: &'static str,
        expected: &'static str,
        key: String,
    },

    /// The tracked resource identity cannot be interpreted.
    #[error("Invalid resource id '{id}': {reason}")]
    InvalidResourceId { id: String, reason: String },

    /// A required attribute was not supplied.
    #[error("Missing required attribute '{0}'")]
    MissingAttribute(String),

    /// The operation needs a resource identity but none is set.
    #[error("Resource has no id; it must be created or imported first")]
    MissingResourceId,

    /// A configuration names an attribute the schema does not define.
    #[error("Unsupported attribute '{0}'")]
    UnknownAttribute(String),

    /// No resource type with this name is registered with the provider.
    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),
}

impl Error {
    /// Returns `true` when the underlying API call reported a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_not_found())
    }
}
