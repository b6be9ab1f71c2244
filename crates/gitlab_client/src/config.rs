//! Connection settings for the GitLab client.

use std::{env, time::Duration};

use secrecy::SecretString;
use url::Url;

use crate::Error;

/// Default GitLab REST API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://gitlab.com/api/v4/";

/// Environment variable holding the personal, project or group access token.
pub const ENV_TOKEN: &str = "GITLAB_TOKEN";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const ENV_BASE_URL: &str = "GITLAB_BASE_URL";

/// Environment variable that disables TLS certificate verification when set to `true` or `1`.
pub const ENV_INSECURE: &str = "GITLAB_INSECURE";

/// Environment variable with the per-request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "GITLAB_TIMEOUT_SECS";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Settings used to build a [`crate::GitLabClient`].
///
/// The token is held as a [`SecretString`] so that `Debug` output never reveals it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, including the `/api/v4/` prefix.
    pub base_url: Url,

    /// Access token sent in the `PRIVATE-TOKEN` header.
    pub token: SecretString,

    /// Accept invalid TLS certificates. Only meant for self-hosted test instances.
    pub insecure: bool,

    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,

    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint and token with default settings.
    ///
    /// A trailing slash is added to `base_url` when missing so that relative API paths join
    /// onto it instead of replacing its last segment.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, Error> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: SecretString::from(token.into()),
            insecure: false,
            timeout: None,
            user_agent: default_user_agent(),
        })
    }

    /// Builds a configuration from the `GITLAB_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if `GITLAB_TOKEN` is missing or empty, or if any
    /// of the optional variables cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        let token = env::var(ENV_TOKEN)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!("{ENV_TOKEN} must be set to an access token"))
            })?;

        let base_url = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url, token)?;

        if let Ok(value) = env::var(ENV_INSECURE) {
            config.insecure = parse_flag(ENV_INSECURE, &value)?;
        }

        if let Ok(value) = env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = value.trim().parse().map_err(|_| {
                Error::InvalidConfiguration(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{value}'"
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables TLS certificate verification.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

/// Parses an API base URL, normalising it to end in `/`.
pub fn parse_base_url(value: &str) -> Result<Url, Error> {
    let mut url = Url::parse(value.trim()).map_err(|e| {
        Error::InvalidConfiguration(format!("invalid GitLab base URL '{value}': {e}"))
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfiguration(format!(
            "GitLab base URL '{value}' cannot be used as a base for API paths"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Parses a boolean environment setting such as `GITLAB_INSECURE`.
pub fn parse_flag(name: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        other => Err(Error::InvalidConfiguration(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}

fn default_user_agent() -> String {
    format!("gitlab-hooks/{}", env!("CARGO_PKG_VERSION"))
}
