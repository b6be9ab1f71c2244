//! GitLab group hook types.
//!
//! See the [GitLab group hooks documentation](https://docs.gitlab.com/ee/api/groups.html#hooks).

use serde::{Deserialize, Serialize};

/// GitLab group hook representation, as returned by the API.
///
/// The API never returns the hook's secret token.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::GroupHook;
///
/// let hook_json = r#"{
///     "id": 42,
///     "url": "https://example.com/hook",
///     "group_id": 7,
///     "push_events": true,
///     "push_events_branch_filter": null,
///     "enable_ssl_verification": true,
///     "created_at": "2024-01-01T00:00:00Z"
/// }"#;
///
/// let hook: GroupHook = serde_json::from_str(hook_json).unwrap();
/// assert_eq!(hook.id, 42);
/// assert!(hook.push_events);
/// assert!(!hook.issues_events);
/// assert_eq!(hook.branch_filter(), "");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupHook {
    /// GitLab-assigned hook ID
    pub id: u64,

    /// URL the hook posts to
    pub url: String,

    /// ID of the group that owns the hook
    #[serde(default)]
    pub group_id: Option<u64>,

    #[serde(default)]
    pub push_events: bool,

    /// Branch filter for push events; `None` when the hook fires for all branches
    #[serde(default)]
    pub push_events_branch_filter: Option<String>,

    #[serde(default)]
    pub issues_events: bool,

    #[serde(default)]
    pub confidential_issues_events: bool,

    #[serde(default)]
    pub merge_requests_events: bool,

    #[serde(default)]
    pub tag_push_events: bool,

    #[serde(default)]
    pub note_events: bool,

    #[serde(default)]
    pub confidential_note_events: bool,

    #[serde(default)]
    pub job_events: bool,

    #[serde(default)]
    pub pipeline_events: bool,

    #[serde(default)]
    pub wiki_page_events: bool,

    #[serde(default)]
    pub deployment_events: bool,

    #[serde(default)]
    pub releases_events: bool,

    #[serde(default)]
    pub subgroup_events: bool,

    #[serde(default)]
    pub enable_ssl_verification: bool,

    /// When the hook was created
    #[serde(default)]
    pub created_at: Option<String>,
}

impl GroupHook {
    /// Returns the push events branch filter, treating an unset filter as empty.
    pub fn branch_filter(&self) -> &str {
        self.push_events_branch_filter.as_deref().unwrap_or_default()
    }
}

/// Request body for adding or editing a group hook.
///
/// GitLab accepts the same attributes for both `POST /groups/:id/hooks` and
/// `PUT /groups/:id/hooks/:hook_id`. Every attribute is always sent so that the remote
/// hook matches the request exactly, except `token`, which is only sent when set.
#[derive(Clone, Default, Serialize, PartialEq, Eq)]
pub struct GroupHookOptions {
    pub url: String,

    /// Secret token GitLab presents in the `X-Gitlab-Token` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    pub push_events: bool,
    pub push_events_branch_filter: String,
    pub issues_events: bool,
    pub confidential_issues_events: bool,
    pub merge_requests_events: bool,
    pub tag_push_events: bool,
    pub note_events: bool,
    pub confidential_note_events: bool,
    pub job_events: bool,
    pub pipeline_events: bool,
    pub wiki_page_events: bool,
    pub deployment_events: bool,
    pub releases_events: bool,
    pub subgroup_events: bool,
    pub enable_ssl_verification: bool,
}

// Hand written so the token never ends up in logs.
impl std::fmt::Debug for GroupHookOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupHookOptions")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("push_events", &self.push_events)
            .field("push_events_branch_filter", &self.push_events_branch_filter)
            .field("issues_events", &self.issues_events)
            .field("confidential_issues_events", &self.confidential_issues_events)
            .field("merge_requests_events", &self.merge_requests_events)
            .field("tag_push_events", &self.tag_push_events)
            .field("note_events", &self.note_events)
            .field("confidential_note_events", &self.confidential_note_events)
            .field("job_events", &self.job_events)
            .field("pipeline_events", &self.pipeline_events)
            .field("wiki_page_events", &self.wiki_page_events)
            .field("deployment_events", &self.deployment_events)
            .field("releases_events", &self.releases_events)
            .field("subgroup_events", &self.subgroup_events)
            .field("enable_ssl_verification", &self.enable_ssl_verification)
            .finish()
    }
}

#[cfg(test)]
#[path = "group_hook_tests.rs"]
mod tests;
