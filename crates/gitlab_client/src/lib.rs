//! Crate for interacting with the GitLab REST API.
//!
//! This crate provides a client for making authenticated requests to GitLab's group hook
//! endpoints, authenticating with an access token sent in the `PRIVATE-TOKEN` header.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{header, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub mod config;
pub use config::ClientConfig;

pub mod errors;
pub use errors::Error;

pub mod group_hook;
pub use group_hook::{GroupHook, GroupHookOptions};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

const PRIVATE_TOKEN_HEADER: &str = "private-token";

/// Trait for group hook operations.
///
/// Groups may be addressed by numeric ID or by full path, e.g. `parent/child`.
#[async_trait]
pub trait GroupHookClient: Send + Sync {
    /// Adds a hook to the group and returns it with its GitLab-assigned ID.
    async fn add_group_hook(&self, group: &str, options: &GroupHookOptions)
        -> Result<GroupHook, Error>;

    /// Fetches a single hook.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the group or hook does not exist.
    async fn get_group_hook(&self, group: &str, hook_id: u64) -> Result<GroupHook, Error>;

    /// Replaces the configuration of an existing hook.
    async fn edit_group_hook(
        &self,
        group: &str,
        hook_id: u64,
        options: &GroupHookOptions,
    ) -> Result<GroupHook, Error>;

    /// Removes a hook from the group.
    async fn delete_group_hook(&self, group: &str, hook_id: u64) -> Result<(), Error>;
}

/// A client for interacting with the GitLab API, authenticated with an access token.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GitLabClient {
    /// Creates a new `GitLabClient` from the given configuration.
    ///
    /// # Errors
    /// Returns an `Error::InvalidConfiguration` if the token cannot be used as a header value
    /// or the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let mut token =
            header::HeaderValue::from_str(config.token.expose_secret()).map_err(|_| {
                Error::InvalidConfiguration(
                    "access token contains characters that are not valid in a header".to_string(),
                )
            })?;
        token.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(PRIVATE_TOKEN_HEADER, token);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.insecure);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            error!(error = %e, "Failed to build the HTTP client");
            Error::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
        })?;

        if config.insecure {
            warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for GitLab requests"
            );
        }

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Returns the API base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL of `groups/{group}/hooks[/{hook_id}]`.
    ///
    /// The group is pushed as a single path segment so that nested group paths are
    /// percent-encoded (`parent/child` becomes `parent%2Fchild`), as GitLab requires.
    fn group_hooks_url(&self, group: &str, hook_id: Option<u64>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::InvalidConfiguration(format!(
                    "base URL '{}' cannot carry API paths",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().push("groups").push(group).push("hooks");
            if let Some(id) = hook_id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = check_status(request.send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GroupHookClient for GitLabClient {
    #[instrument(skip(self, options), fields(group = %group, url = %options.url))]
    async fn add_group_hook(
        &self,
        group: &str,
        options: &GroupHookOptions,
    ) -> Result<GroupHook, Error> {
        let url = self.group_hooks_url(group, None)?;
        debug!(endpoint = %url, "Adding group hook");

        let hook: GroupHook = self
            .send_json(self.request(Method::POST, url).json(options))
            .await
            .inspect_err(|e| log_gitlab_error("Failed to add group hook", e))?;

        info!(group = group, hook_id = hook.id, "Added group hook");
        Ok(hook)
    }

    #[instrument(skip(self), fields(group = %group, hook_id = hook_id))]
    async fn get_group_hook(&self, group: &str, hook_id: u64) -> Result<GroupHook, Error> {
        let url = self.group_hooks_url(group, Some(hook_id))?;
        debug!(endpoint = %url, "Fetching group hook");

        self.send_json(self.request(Method::GET, url))
            .await
            .inspect_err(|e| {
                if !e.is_not_found() {
                    log_gitlab_error("Failed to get group hook", e);
                }
            })
    }

    #[instrument(skip(self, options), fields(group = %group, hook_id = hook_id))]
    async fn edit_group_hook(
        &self,
        group: &str,
        hook_id: u64,
        options: &GroupHookOptions,
    ) -> Result<GroupHook, Error> {
        let url = self.group_hooks_url(group, Some(hook_id))?;
        debug!(
            endpoint = %url,
            token_included = options.token.is_some(),
            "Editing group hook"
        );

        let hook: GroupHook = self
            .send_json(self.request(Method::PUT, url).json(options))
            .await
            .inspect_err(|e| log_gitlab_error("Failed to edit group hook", e))?;

        info!(group = group, hook_id = hook.id, "Edited group hook");
        Ok(hook)
    }

    #[instrument(skip(self), fields(group = %group, hook_id = hook_id))]
    async fn delete_group_hook(&self, group: &str, hook_id: u64) -> Result<(), Error> {
        let url = self.group_hooks_url(group, Some(hook_id))?;
        debug!(endpoint = %url, "Deleting group hook");

        let response = self.request(Method::DELETE, url).send().await?;
        check_status(response)
            .await
            .inspect_err(|e| log_gitlab_error("Failed to delete group hook", e))?;

        info!(group = group, hook_id = hook_id, "Deleted group hook");
        Ok(())
    }
}

/// Creates a client for the given endpoint authenticated with an access token.
#[instrument(skip(token))]
pub fn create_token_client(base_url: &str, token: &str) -> Result<GitLabClient, Error> {
    let config = ClientConfig::new(base_url, token)?;
    GitLabClient::new(&config)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Maps an unsuccessful response onto an [`Error`], keeping GitLab's message verbatim.
async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body, status);

    Err(match status {
        StatusCode::NOT_FOUND => Error::NotFound,
        StatusCode::UNAUTHORIZED => Error::AuthError(message),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
        _ => Error::Api {
            status: status.as_u16(),
            message,
        },
    })
}

fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        // GitLab sends validation failures as an object keyed by attribute.
        match (parsed.message, parsed.error) {
            (Some(serde_json::Value::String(message)), _) => return message,
            (Some(other), _) => return other.to_string(),
            (None, Some(error)) => return error,
            (None, None) => {}
        }
    }

    if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    }
}

fn log_gitlab_error(message: &str, e: &Error) {
    match e {
        Error::Api { status, message: api_message } => error!(
            status = status,
            error_message = api_message.as_str(),
            "{}. Received an error from GitLab",
            message
        ),
        Error::AuthError(detail) => error!(
            error_message = detail.as_str(),
            "{}. Authentication was rejected",
            message
        ),
        Error::RateLimitExceeded => warn!("{}. Rate limit exceeded", message),
        _ => error!(error_message = e.to_string(), "{}", message),
    }
}
