//! In-memory stand-in for the GitLab group hooks API, shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use gitlab_client::{Error, GroupHook, GroupHookClient, GroupHookOptions};

/// A request the fake received, with the options it was sent.
#[derive(Debug, Clone)]
pub enum RecordedRequest {
    Add { group: String, options: GroupHookOptions },
    Get { group: String, hook_id: u64 },
    Edit { group: String, hook_id: u64, options: GroupHookOptions },
    Delete { group: String, hook_id: u64 },
}

#[derive(Default)]
struct FakeState {
    next_id: u64,
    hooks: BTreeMap<(String, u64), GroupHook>,
    tokens: BTreeMap<(String, u64), String>,
    requests: Vec<RecordedRequest>,
    fail_get_with_status: Option<u16>,
}

/// Stores hooks per group and answers like GitLab does, including 404s.
#[derive(Default)]
pub struct FakeGitLab {
    state: Mutex<FakeState>,
}

impl FakeGitLab {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    /// The most recent options sent with an add or edit request.
    pub fn last_write(&self) -> Option<GroupHookOptions> {
        self.requests().into_iter().rev().find_map(|r| match r {
            RecordedRequest::Add { options, .. } | RecordedRequest::Edit { options, .. } => {
                Some(options)
            }
            _ => None,
        })
    }

    pub fn hook(&self, group: &str, hook_id: u64) -> Option<GroupHook> {
        self.state
            .lock()
            .unwrap()
            .hooks
            .get(&(group.to_string(), hook_id))
            .cloned()
    }

    pub fn token(&self, group: &str, hook_id: u64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .get(&(group.to_string(), hook_id))
            .cloned()
    }

    /// Inserts a hook directly, as if it had been created outside the provider.
    pub fn insert_hook(&self, group: &str, hook: GroupHook) {
        self.state
            .lock()
            .unwrap()
            .hooks
            .insert((group.to_string(), hook.id), hook);
    }

    /// Changes a stored hook behind the provider's back.
    pub fn modify_hook(&self, group: &str, hook_id: u64, change: impl FnOnce(&mut GroupHook)) {
        let mut state = self.state.lock().unwrap();
        let hook = state
            .hooks
            .get_mut(&(group.to_string(), hook_id))
            .expect("hook to modify must exist");
        change(hook);
    }

    pub fn fail_gets_with_status(&self, status: u16) {
        self.state.lock().unwrap().fail_get_with_status = Some(status);
    }
}

fn apply_options(hook: &mut GroupHook, options: &GroupHookOptions) {
    hook.url = options.url.clone();
    hook.push_events = options.push_events;
    // GitLab reports an empty filter as null.
    hook.push_events_branch_filter = Some(options.push_events_branch_filter.clone())
        .filter(|f| !f.is_empty());
    hook.issues_events = options.issues_events;
    hook.confidential_issues_events = options.confidential_issues_events;
    hook.merge_requests_events = options.merge_requests_events;
    hook.tag_push_events = options.tag_push_events;
    hook.note_events = options.note_events;
    hook.confidential_note_events = options.confidential_note_events;
    hook.job_events = options.job_events;
    hook.pipeline_events = options.pipeline_events;
    hook.wiki_page_events = options.wiki_page_events;
    hook.deployment_events = options.deployment_events;
    hook.releases_events = options.releases_events;
    hook.subgroup_events = options.subgroup_events;
    hook.enable_ssl_verification = options.enable_ssl_verification;
}

#[async_trait]
impl GroupHookClient for FakeGitLab {
    async fn add_group_hook(
        &self,
        group: &str,
        options: &GroupHookOptions,
    ) -> Result<GroupHook, Error> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Add {
            group: group.to_string(),
            options: options.clone(),
        });

        state.next_id += 1;
        let mut hook = GroupHook {
            id: state.next_id,
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        apply_options(&mut hook, options);

        let key = (group.to_string(), hook.id);
        if let Some(token) = &options.token {
            state.tokens.insert(key.clone(), token.clone());
        }
        state.hooks.insert(key, hook.clone());
        Ok(hook)
    }

    async fn get_group_hook(&self, group: &str, hook_id: u64) -> Result<GroupHook, Error> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Get {
            group: group.to_string(),
            hook_id,
        });

        if let Some(status) = state.fail_get_with_status {
            return Err(Error::Api {
                status,
                message: format!("{status} Injected failure"),
            });
        }

        state
            .hooks
            .get(&(group.to_string(), hook_id))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn edit_group_hook(
        &self,
        group: &str,
        hook_id: u64,
        options: &GroupHookOptions,
    ) -> Result<GroupHook, Error> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Edit {
            group: group.to_string(),
            hook_id,
            options: options.clone(),
        });

        let key = (group.to_string(), hook_id);
        let hook = state.hooks.get_mut(&key).ok_or(Error::NotFound)?;
        apply_options(hook, options);
        let hook = hook.clone();

        if let Some(token) = &options.token {
            state.tokens.insert(key, token.clone());
        }
        Ok(hook)
    }

    async fn delete_group_hook(&self, group: &str, hook_id: u64) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Delete {
            group: group.to_string(),
            hook_id,
        });

        let key = (group.to_string(), hook_id);
        state.tokens.remove(&key);
        state.hooks.remove(&key).map(|_| ()).ok_or(Error::NotFound)
    }
}
