//! Error types for GitLab client operations.
//!
//! This module defines the error types that can occur when interacting with the GitLab API
//! through the gitlab_client crate. Callers that need to tell a missing resource apart from
//! every other failure should use [`Error::is_not_found`].

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitLab client operations.
///
/// Each variant carries the context GitLab returned, unmodified, so that callers can surface
/// it verbatim.
///
/// ## Examples
///
/// ```rust,ignore
/// use gitlab_client::Error;
///
/// match client.get_group_hook("my-group", 42).await {
///     Ok(hook) => println!("Hook points at {}", hook.url),
///     Err(Error::NotFound) => println!("Hook is gone"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The GitLab API returned an unsuccessful status code.
    ///
    /// The message is taken from the `message` or `error` field of the response body when
    /// present, and from the raw body otherwise.
    #[error("GitLab API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Authentication with GitLab failed.
    ///
    /// This error occurs when the access token is missing, invalid, expired or lacks the
    /// scope needed for the request.
    #[error("Failed to authenticate with GitLab: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitLab.
    #[error("Failed to deserialize GitLab response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The client could not be built from the supplied configuration.
    #[error("Invalid GitLab client configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitLab API request returns a 404 status code, indicating that
    /// the group or hook does not exist or is not visible with the current token.
    #[error("Resource not found")]
    NotFound,

    /// GitLab API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The request did not complete within the configured timeout.
    #[error("Request to GitLab timed out")]
    Timeout,

    /// The request could not be sent or the response could not be received.
    #[error("Failed to communicate with GitLab: {0}")]
    Transport(String),
}

impl Error {
    /// Returns `true` when GitLab reported that the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout;
        }

        if value.is_decode() {
            return Self::Transport(format!("failed to decode response body: {value}"));
        }

        Self::Transport(value.to_string())
    }
}
