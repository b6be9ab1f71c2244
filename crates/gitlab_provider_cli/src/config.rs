//! Configuration management for the gitlab-hooks CLI.
//!
//! Connection settings and the location of the state file are stored in TOML. Every
//! connection setting can be overridden through the same environment variables the GitLab
//! client reads; the access token is only ever taken from the environment so that it never
//! ends up in a file on disk.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use gitlab_client::config::{
    parse_flag, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_INSECURE, ENV_TIMEOUT_SECS, ENV_TOKEN,
};
use gitlab_client::ClientConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "gitlab-hooks.toml";

/// Default state file name
pub const DEFAULT_STATE_FILENAME: &str = "gitlab-hooks.state.json";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the gitlab-hooks CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// state_file = "hooks.state.json"
///
/// [gitlab]
/// base_url = "https://gitlab.example.com/api/v4"
/// insecure = false
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the JSON file that tracks managed resources.
    #[serde(default = "AppConfig::default_state_file")]
    pub state_file: PathBuf,

    /// GitLab connection settings
    #[serde(default)]
    pub gitlab: GitLabConfig,
}

impl AppConfig {
    fn default_state_file() -> PathBuf {
        PathBuf::from(DEFAULT_STATE_FILENAME)
    }

    /// Loads configuration from a TOML file at the specified path.
    ///
    /// A missing file is not an error: the defaults are returned instead, so the tool works
    /// against gitlab.com without any configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            debug!("Configuration file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Saves the configuration to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Replaces file values with the ones set in the environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if an override has a value that cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), Error> {
        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            self.gitlab.base_url = base_url;
        }

        if let Ok(insecure) = env::var(ENV_INSECURE) {
            self.gitlab.insecure =
                parse_flag(ENV_INSECURE, &insecure).map_err(|e| Error::Config(e.to_string()))?;
        }

        if let Ok(timeout) = env::var(ENV_TIMEOUT_SECS) {
            let secs = timeout.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{timeout}'"
                ))
            })?;
            self.gitlab.timeout_secs = Some(secs);
        }

        Ok(())
    }

    /// Builds the client settings, taking the access token from `GITLAB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the token is missing or the base URL is invalid.
    pub fn client_config(&self) -> Result<ClientConfig, Error> {
        let token = env::var(ENV_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{ENV_TOKEN} must be set")))?;

        let mut config = ClientConfig::new(&self.gitlab.base_url, token)
            .map_err(|e| Error::Config(e.to_string()))?
            .with_insecure(self.gitlab.insecure);

        if let Some(secs) = self.gitlab.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: Self::default_state_file(),
            gitlab: GitLabConfig::default(),
        }
    }
}

/// Connection settings for the GitLab API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitLabConfig {
    /// REST API endpoint, including the `/api/v4` prefix.
    #[serde(default = "GitLabConfig::default_base_url")]
    pub base_url: String,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl GitLabConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            insecure: false,
            timeout_secs: None,
        }
    }
}

/// Resolves the path to the configuration file.
///
/// Uses `config_path` when given, otherwise `gitlab-hooks.toml` in the current directory.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
