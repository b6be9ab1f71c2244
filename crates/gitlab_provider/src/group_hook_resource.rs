//! The `gitlab_group_hook` resource.
//!
//! Manages the lifecycle of a webhook attached to a GitLab group. The resource id is the
//! GitLab-assigned hook id; the owning `group` is tracked as an attribute because the id is
//! only addressable together with it.
//!
//! The hook's `token` is write-only: GitLab never returns it. The locally known value is
//! trusted after every write and is never touched by a read, which also means an imported
//! hook starts without a token.
//!
//! Upstream API: <https://docs.gitlab.com/ee/api/groups.html#hooks>

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use gitlab_client::{GroupHook, GroupHookClient, GroupHookOptions};
use tracing::{debug, info, instrument};

use crate::errors::{Error, ProviderResult};
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, ResourceSchema};

#[cfg(test)]
#[path = "group_hook_resource_tests.rs"]
mod tests;

/// Name the resource is registered under.
pub const GROUP_HOOK_RESOURCE_TYPE: &str = "gitlab_group_hook";

pub const ATTR_GROUP: &str = "group";
pub const ATTR_URL: &str = "url";
pub const ATTR_TOKEN: &str = "token";
pub const ATTR_PUSH_EVENTS: &str = "push_events";
pub const ATTR_PUSH_EVENTS_BRANCH_FILTER: &str = "push_events_branch_filter";
pub const ATTR_ISSUES_EVENTS: &str = "issues_events";
pub const ATTR_CONFIDENTIAL_ISSUES_EVENTS: &str = "confidential_issues_events";
pub const ATTR_MERGE_REQUESTS_EVENTS: &str = "merge_requests_events";
pub const ATTR_TAG_PUSH_EVENTS: &str = "tag_push_events";
pub const ATTR_NOTE_EVENTS: &str = "note_events";
pub const ATTR_CONFIDENTIAL_NOTE_EVENTS: &str = "confidential_note_events";
pub const ATTR_JOB_EVENTS: &str = "job_events";
pub const ATTR_PIPELINE_EVENTS: &str = "pipeline_events";
pub const ATTR_WIKI_PAGE_EVENTS: &str = "wiki_page_events";
pub const ATTR_DEPLOYMENT_EVENTS: &str = "deployment_events";
pub const ATTR_RELEASES_EVENTS: &str = "releases_events";
pub const ATTR_SUBGROUP_EVENTS: &str = "subgroup_events";
pub const ATTR_ENABLE_SSL_VERIFICATION: &str = "enable_ssl_verification";

const IMPORT_FORMAT: &str = "{group_id}:{hook_id}";

/// Builds the schema of the `gitlab_group_hook` resource.
pub fn group_hook_schema() -> ResourceSchema {
    ResourceSchema::new(
        "The `gitlab_group_hook` resource allows to manage the lifecycle of a group hook.",
        vec![
            Attribute::required_string(ATTR_GROUP, "The name or id of the group to add the hook to.")
                .force_new(),
            Attribute::required_string(ATTR_URL, "The url of the hook to invoke."),
            Attribute::optional_string(
                ATTR_TOKEN,
                "A token to present when invoking the hook. The token is not available for imported resources.",
            )
            .sensitive(),
            Attribute::optional_bool(ATTR_PUSH_EVENTS, "Invoke the hook for push events.", true),
            Attribute::optional_string(
                ATTR_PUSH_EVENTS_BRANCH_FILTER,
                "Invoke the hook for push events on matching branches only.",
            ),
            Attribute::optional_bool(ATTR_ISSUES_EVENTS, "Invoke the hook for issues events.", false),
            Attribute::optional_bool(
                ATTR_CONFIDENTIAL_ISSUES_EVENTS,
                "Invoke the hook for confidential issues events.",
                false,
            ),
            Attribute::optional_bool(
                ATTR_MERGE_REQUESTS_EVENTS,
                "Invoke the hook for merge requests.",
                false,
            ),
            Attribute::optional_bool(ATTR_TAG_PUSH_EVENTS, "Invoke the hook for tag push events.", false),
            Attribute::optional_bool(ATTR_NOTE_EVENTS, "Invoke the hook for notes events.", false),
            Attribute::optional_bool(
                ATTR_CONFIDENTIAL_NOTE_EVENTS,
                "Invoke the hook for confidential notes events.",
                false,
            ),
            Attribute::optional_bool(ATTR_JOB_EVENTS, "Invoke the hook for job events.", false),
            Attribute::optional_bool(ATTR_PIPELINE_EVENTS, "Invoke the hook for pipeline events.", false),
            Attribute::optional_bool(ATTR_WIKI_PAGE_EVENTS, "Invoke the hook for wiki page events.", false),
            Attribute::optional_bool(
                ATTR_DEPLOYMENT_EVENTS,
                "Invoke the hook for deployment events.",
                false,
            ),
            Attribute::optional_bool(ATTR_RELEASES_EVENTS, "Invoke the hook for releases events.", false),
            Attribute::optional_bool(
                ATTR_SUBGROUP_EVENTS,
                "Invoke the hook when a subgroup is created or removed.",
                false,
            ),
            Attribute::optional_bool(
                ATTR_ENABLE_SSL_VERIFICATION,
                "Enable ssl verification when invoking the hook.",
                true,
            ),
        ],
    )
}

/// A parsed `{group}:{hook_id}` import key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub group: String,
    pub hook_id: u64,
}

impl ImportId {
    /// Parses an import key of the exact form `group:hook_id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidImportId` unless the key splits on `:` into exactly two parts,
    /// the group is non-empty and the hook id is an unsigned integer.
    pub fn parse(key: &str) -> ProviderResult<Self> {
        let invalid = || Error::InvalidImportId {
            resource: "Group Hook",
            expected: IMPORT_FORMAT,
            key: key.to_string(),
        };

        let parts: Vec<&str> = key.split(':').collect();
        let [group, hook_id] = parts.as_slice() else {
            return Err(invalid());
        };

        if group.is_empty() {
            return Err(invalid());
        }
        let hook_id = hook_id.parse::<u64>().map_err(|_| invalid())?;

        Ok(Self {
            group: group.to_string(),
            hook_id,
        })
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.hook_id)
    }
}

/// CRUD adapter between the `gitlab_group_hook` schema and the GitLab group hooks API.
pub struct GroupHookResource {
    client: Arc<dyn GroupHookClient>,
    schema: ResourceSchema,
}

impl GroupHookResource {
    pub fn new(client: Arc<dyn GroupHookClient>) -> Self {
        Self {
            client,
            schema: group_hook_schema(),
        }
    }
}

#[async_trait]
impl Resource for GroupHookResource {
    fn type_name(&self) -> &'static str {
        GROUP_HOOK_RESOURCE_TYPE
    }

    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    #[instrument(skip(self, data))]
    async fn create(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let group = data.get_string(ATTR_GROUP)?;
        let mut options = hook_options(data)?;
        options.token = data.get_non_empty_string(ATTR_TOKEN)?;

        debug!(group = group.as_str(), url = options.url.as_str(), "create gitlab group hook");

        let hook = self.client.add_group_hook(&group, &options).await?;

        data.set_id(hook.id.to_string());
        data.set_optional(ATTR_TOKEN, options.token);

        info!(group = group.as_str(), hook_id = hook.id, "Created gitlab group hook");

        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn read(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let group = data.get_string(ATTR_GROUP)?;
        let hook_id = hook_id(data)?;

        debug!(group = group.as_str(), hook_id, "read gitlab group hook");

        let hook = match self.client.get_group_hook(&group, hook_id).await {
            Ok(hook) => hook,
            Err(e) if e.is_not_found() => {
                debug!(group = group.as_str(), hook_id, "gitlab group hook not found");
                data.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        apply_remote_state(data, &hook);
        Ok(())
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn update(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let group = data.get_string(ATTR_GROUP)?;
        let hook_id = hook_id(data)?;
        let mut options = hook_options(data)?;

        if data.has_change(ATTR_TOKEN) {
            options.token = Some(data.get_string(ATTR_TOKEN)?);
        }

        debug!(
            group = group.as_str(),
            hook_id,
            token_changed = options.token.is_some(),
            "update gitlab group hook"
        );

        self.client
            .edit_group_hook(&group, hook_id, &options)
            .await?;

        self.read(data).await
    }

    #[instrument(skip(self, data), fields(id = data.id()))]
    async fn delete(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let group = data.get_string(ATTR_GROUP)?;
        let hook_id = hook_id(data)?;

        debug!(group = group.as_str(), hook_id, "delete gitlab group hook");

        self.client.delete_group_hook(&group, hook_id).await?;

        info!(group = group.as_str(), hook_id, "Deleted gitlab group hook");
        Ok(())
    }

    #[instrument(skip(self, data), fields(key = data.id()))]
    async fn import(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let key = data.id().unwrap_or_default().to_string();

        let import_id = match ImportId::parse(&key) {
            Ok(import_id) => import_id,
            Err(e) => {
                data.clear_id();
                return Err(e);
            }
        };

        data.set_id(import_id.hook_id.to_string());
        data.set(ATTR_GROUP, import_id.group);
        Ok(())
    }
}

fn hook_id(data: &ResourceData) -> ProviderResult<u64> {
    let id = data.require_id()?;
    id.parse::<u64>().map_err(|e| Error::InvalidResourceId {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the request body from every attribute except the token.
fn hook_options(data: &ResourceData) -> ProviderResult<GroupHookOptions> {
    Ok(GroupHookOptions {
        url: data.get_string(ATTR_URL)?,
        token: None,
        push_events: data.get_bool(ATTR_PUSH_EVENTS)?,
        push_events_branch_filter: data.get_string(ATTR_PUSH_EVENTS_BRANCH_FILTER)?,
        issues_events: data.get_bool(ATTR_ISSUES_EVENTS)?,
        confidential_issues_events: data.get_bool(ATTR_CONFIDENTIAL_ISSUES_EVENTS)?,
        merge_requests_events: data.get_bool(ATTR_MERGE_REQUESTS_EVENTS)?,
        tag_push_events: data.get_bool(ATTR_TAG_PUSH_EVENTS)?,
        note_events: data.get_bool(ATTR_NOTE_EVENTS)?,
        confidential_note_events: data.get_bool(ATTR_CONFIDENTIAL_NOTE_EVENTS)?,
        job_events: data.get_bool(ATTR_JOB_EVENTS)?,
        pipeline_events: data.get_bool(ATTR_PIPELINE_EVENTS)?,
        wiki_page_events: data.get_bool(ATTR_WIKI_PAGE_EVENTS)?,
        deployment_events: data.get_bool(ATTR_DEPLOYMENT_EVENTS)?,
        releases_events: data.get_bool(ATTR_RELEASES_EVENTS)?,
        subgroup_events: data.get_bool(ATTR_SUBGROUP_EVENTS)?,
        enable_ssl_verification: data.get_bool(ATTR_ENABLE_SSL_VERIFICATION)?,
    })
}

/// Overwrites every readable attribute with the remote values. `group` and `token` are kept.
fn apply_remote_state(data: &mut ResourceData, hook: &GroupHook) {
    data.set(ATTR_URL, hook.url.as_str());
    data.set(ATTR_PUSH_EVENTS, hook.push_events);
    data.set(ATTR_PUSH_EVENTS_BRANCH_FILTER, hook.branch_filter());
    data.set(ATTR_ISSUES_EVENTS, hook.issues_events);
    data.set(ATTR_CONFIDENTIAL_ISSUES_EVENTS, hook.confidential_issues_events);
    data.set(ATTR_MERGE_REQUESTS_EVENTS, hook.merge_requests_events);
    data.set(ATTR_TAG_PUSH_EVENTS, hook.tag_push_events);
    data.set(ATTR_NOTE_EVENTS, hook.note_events);
    data.set(ATTR_CONFIDENTIAL_NOTE_EVENTS, hook.confidential_note_events);
    data.set(ATTR_JOB_EVENTS, hook.job_events);
    data.set(ATTR_PIPELINE_EVENTS, hook.pipeline_events);
    data.set(ATTR_WIKI_PAGE_EVENTS, hook.wiki_page_events);
    data.set(ATTR_DEPLOYMENT_EVENTS, hook.deployment_events);
    data.set(ATTR_RELEASES_EVENTS, hook.releases_events);
    data.set(ATTR_SUBGROUP_EVENTS, hook.subgroup_events);
    data.set(ATTR_ENABLE_SSL_VERIFICATION, hook.enable_ssl_verification);
}
