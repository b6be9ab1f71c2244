//! Helpers for the acceptance tests that run against a live GitLab instance.
//!
//! The tests under `tests/` are ignored by default. To run them, point the environment at a
//! GitLab instance and a group the token may manage hooks in:
//!
//! ```text
//! GITLAB_TOKEN=glpat-... GITLAB_BASE_URL=https://gitlab.example.com/api/v4 \
//! GITLAB_TEST_GROUP=my-group cargo test -p acceptance_tests -- --ignored
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use gitlab_client::{ClientConfig, GitLabClient, GroupHookClient};
use std::env;
use tracing::{info, warn};
use uuid::Uuid;

/// Environment variable naming the group the acceptance tests create hooks in.
pub const ENV_TEST_GROUP: &str = "GITLAB_TEST_GROUP";

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Connection settings and target group for a live acceptance run.
#[derive(Debug, Clone)]
pub struct AcceptanceConfig {
    pub client: ClientConfig,
    pub group: String,
}

impl AcceptanceConfig {
    /// Reads `GITLAB_TOKEN`, `GITLAB_BASE_URL` and `GITLAB_TEST_GROUP`.
    pub fn from_env() -> Result<Self> {
        let client = ClientConfig::from_env().context("GitLab connection settings")?;
        let group = env::var(ENV_TEST_GROUP)
            .ok()
            .filter(|g| !g.trim().is_empty())
            .with_context(|| format!("{ENV_TEST_GROUP} not set"))?;

        Ok(Self { client, group })
    }
}

/// Extract the CI pipeline context for naming test hooks.
///
/// Returns:
/// - `mr{iid}` for merge request pipelines (e.g., "mr42")
/// - `main` for pipelines on main/master
/// - the branch slug for other branch pipelines
/// - `local` outside of CI
pub fn get_pipeline_context() -> String {
    if let Ok(iid) = env::var("CI_MERGE_REQUEST_IID") {
        return format!("mr{}", iid);
    }

    if let Ok(slug) = env::var("CI_COMMIT_REF_SLUG") {
        if slug == "main" || slug == "master" {
            return "main".to_string();
        }
        return slug;
    }

    "local".to_string()
}

/// Generate a unique hook URL so that concurrent runs never collide.
///
/// Format: `https://example.com/gitlab-hooks/{context}-{timestamp}-{test-name}-{random}`
pub fn generate_hook_url(test_name: &str) -> String {
    let context = get_pipeline_context();
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let random_suffix = Uuid::new_v4().simple().to_string()[..6].to_lowercase();
    format!(
        "https://example.com/gitlab-hooks/{}-{}-{}-{}",
        context, timestamp, test_name, random_suffix
    )
}

/// Install a test log subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("GITLAB_HOOKS_LOG"))
        .with_test_writer()
        .try_init();
}

/// Delete a test hook (best effort cleanup).
///
/// Failures are logged and never propagate, so a failed test is not masked by a failed
/// cleanup.
pub async fn cleanup_group_hook(config: &AcceptanceConfig, hook_id: u64) {
    info!(
        group = %config.group,
        hook_id = hook_id,
        "Attempting best-effort cleanup of test hook"
    );

    let client = match GitLabClient::new(&config.client) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to create GitLab client for cleanup");
            return;
        }
    };

    match client.delete_group_hook(&config.group, hook_id).await {
        Ok(()) => info!(hook_id = hook_id, "Cleaned up test hook"),
        Err(e) if e.is_not_found() => info!(hook_id = hook_id, "Test hook already removed"),
        Err(e) => warn!(hook_id = hook_id, error = %e, "Failed to delete test hook"),
    }
}
