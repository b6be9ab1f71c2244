//! Shared fixtures for the command tests: a mock GitLab server and a session pointing at it.

use std::collections::BTreeMap;

use gitlab_client::ClientConfig;
use gitlab_provider::{
    AttributeValue, CancellationToken, Provider, ResourceState, GROUP_HOOK_RESOURCE_TYPE,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::MockServer;

use super::Session;

pub const TEST_GROUP: &str = "acme";

pub fn hook_body(id: u64, url: &str) -> serde_json::Value {
    json!({
        "id": id,
        "url": url,
        "group_id": 3,
        "push_events": true,
        "push_events_branch_filter": null,
        "issues_events": false,
        "confidential_issues_events": false,
        "merge_requests_events": false,
        "tag_push_events": false,
        "note_events": false,
        "confidential_note_events": false,
        "job_events": false,
        "pipeline_events": false,
        "wiki_page_events": false,
        "deployment_events": false,
        "releases_events": false,
        "subgroup_events": false,
        "enable_ssl_verification": true,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub fn hooks_path(id: Option<u64>) -> String {
    match id {
        Some(id) => format!("/api/v4/groups/{TEST_GROUP}/hooks/{id}"),
        None => format!("/api/v4/groups/{TEST_GROUP}/hooks"),
    }
}

/// A session whose state file lives in `temp_dir` and whose requests go to `server`.
pub fn session(server: &MockServer, temp_dir: &TempDir) -> Session {
    let config = ClientConfig::new(&format!("{}/api/v4", server.uri()), "glpat-test").unwrap();
    let provider = Provider::from_config(&config).unwrap();
    Session::new(
        provider,
        GROUP_HOOK_RESOURCE_TYPE,
        temp_dir.path().join("state.json"),
        CancellationToken::new(),
    )
}

pub fn desired(group: &str, url: &str) -> BTreeMap<String, AttributeValue> {
    BTreeMap::from([
        ("group".to_string(), AttributeValue::from(group)),
        ("url".to_string(), AttributeValue::from(url)),
    ])
}

/// State as a previous apply of `desired(group, url)` would have recorded it.
pub fn tracked_state(session: &Session, id: u64, group: &str, url: &str) -> ResourceState {
    let mut attributes = session
        .schema()
        .unwrap()
        .resolve(desired(group, url))
        .unwrap();
    attributes.insert(
        "push_events_branch_filter".to_string(),
        AttributeValue::from(""),
    );
    ResourceState {
        id: id.to_string(),
        attributes,
    }
}
