use super::*;
use crate::group_hook_resource::*;
use crate::schema::AttributeValue;
use crate::test_support::FakeGitLab;
use async_trait::async_trait;
use gitlab_client::{GroupHook, GroupHookOptions};
use std::collections::BTreeMap;
use std::time::Duration;

const TEST_GROUP: &str = "acceptance-group";

/// A client whose requests never complete.
struct HangingClient;

#[async_trait]
impl GroupHookClient for HangingClient {
    async fn add_group_hook(
        &self,
        _group: &str,
        _options: &GroupHookOptions,
    ) -> Result<GroupHook, gitlab_client::Error> {
        std::future::pending().await
    }

    async fn get_group_hook(
        &self,
        _group: &str,
        _hook_id: u64,
    ) -> Result<GroupHook, gitlab_client::Error> {
        std::future::pending().await
    }

    async fn edit_group_hook(
        &self,
        _group: &str,
        _hook_id: u64,
        _options: &GroupHookOptions,
    ) -> Result<GroupHook, gitlab_client::Error> {
        std::future::pending().await
    }

    async fn delete_group_hook(
        &self,
        _group: &str,
        _hook_id: u64,
    ) -> Result<(), gitlab_client::Error> {
        std::future::pending().await
    }
}

fn config(pairs: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn minimal_config(url: &str) -> BTreeMap<String, AttributeValue> {
    config(&[(ATTR_GROUP, TEST_GROUP.into()), (ATTR_URL, url.into())])
}

/// Every option moved away from its default, with a branch filter.
fn toggled_config(url: &str) -> BTreeMap<String, AttributeValue> {
    config(&[
        (ATTR_GROUP, TEST_GROUP.into()),
        (ATTR_URL, url.into()),
        (ATTR_ENABLE_SSL_VERIFICATION, false.into()),
        (ATTR_PUSH_EVENTS, true.into()),
        (ATTR_PUSH_EVENTS_BRANCH_FILTER, "devel".into()),
        (ATTR_ISSUES_EVENTS, false.into()),
        (ATTR_CONFIDENTIAL_ISSUES_EVENTS, false.into()),
        (ATTR_MERGE_REQUESTS_EVENTS, true.into()),
        (ATTR_TAG_PUSH_EVENTS, true.into()),
        (ATTR_NOTE_EVENTS, true.into()),
        (ATTR_CONFIDENTIAL_NOTE_EVENTS, true.into()),
        (ATTR_JOB_EVENTS, true.into()),
        (ATTR_PIPELINE_EVENTS, true.into()),
        (ATTR_WIKI_PAGE_EVENTS, true.into()),
        (ATTR_DEPLOYMENT_EVENTS, true.into()),
        (ATTR_RELEASES_EVENTS, true.into()),
        (ATTR_SUBGROUP_EVENTS, true.into()),
    ])
}

fn bool_attr(state: &ResourceState, name: &str) -> bool {
    state.attributes[name]
        .as_bool()
        .unwrap_or_else(|| panic!("{name} must be a bool"))
}

fn string_attr<'a>(state: &'a ResourceState, name: &str) -> &'a str {
    state.attributes[name]
        .as_str()
        .unwrap_or_else(|| panic!("{name} must be a string"))
}

#[test]
fn test_registry_contains_group_hook() {
    let provider = Provider::new(Arc::new(FakeGitLab::new()));

    let types: Vec<_> = provider.resource_types().collect();
    assert_eq!(types, vec![GROUP_HOOK_RESOURCE_TYPE]);

    let resource = provider.resource(GROUP_HOOK_RESOURCE_TYPE).unwrap();
    assert_eq!(resource.type_name(), GROUP_HOOK_RESOURCE_TYPE);
    assert!(resource.schema().attribute(ATTR_TOKEN).unwrap().sensitive);
}

#[test]
fn test_unknown_resource_type() {
    let provider = Provider::new(Arc::new(FakeGitLab::new()));

    let result = provider.resource("gitlab_project_hook");

    assert!(matches!(result, Err(Error::UnknownResourceType(name)) if name == "gitlab_project_hook"));
}

#[test]
fn test_from_config_builds_http_provider() {
    let config = ClientConfig::new("https://gitlab.example.com/api/v4", "glpat-test").unwrap();

    let provider = Provider::from_config(&config).unwrap();

    assert!(provider.resource(GROUP_HOOK_RESOURCE_TYPE).is_ok());
}

#[tokio::test]
async fn test_full_lifecycle_scenario() {
    let fake = Arc::new(FakeGitLab::new());
    let provider = Provider::new(fake.clone());
    let schema = provider.resource(GROUP_HOOK_RESOURCE_TYPE).unwrap().schema().clone();
    let cancel = CancellationToken::new();
    let url = "https://example.com/hook-1";

    // Create a hook with default options.
    let mut data = ResourceData::from_config(&schema, minimal_config(url)).unwrap();
    provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Create, &mut data, &cancel)
        .await
        .unwrap();
    let created = data.to_state().unwrap();

    assert_eq!(string_attr(&created, ATTR_URL), url);
    assert!(bool_attr(&created, ATTR_PUSH_EVENTS));
    assert!(bool_attr(&created, ATTR_ENABLE_SSL_VERIFICATION));
    assert_eq!(string_attr(&created, ATTR_PUSH_EVENTS_BRANCH_FILTER), "");
    assert!(!bool_attr(&created, ATTR_MERGE_REQUESTS_EVENTS));

    // Toggle the options.
    let mut data = ResourceData::for_update(&schema, &created, toggled_config(url)).unwrap();
    provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Update, &mut data, &cancel)
        .await
        .unwrap();
    let updated = data.to_state().unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(string_attr(&updated, ATTR_PUSH_EVENTS_BRANCH_FILTER), "devel");
    assert!(!bool_attr(&updated, ATTR_ENABLE_SSL_VERIFICATION));
    assert!(bool_attr(&updated, ATTR_PUSH_EVENTS));
    assert!(!bool_attr(&updated, ATTR_ISSUES_EVENTS));
    assert!(!bool_attr(&updated, ATTR_CONFIDENTIAL_ISSUES_EVENTS));
    for name in [
        ATTR_MERGE_REQUESTS_EVENTS,
        ATTR_TAG_PUSH_EVENTS,
        ATTR_NOTE_EVENTS,
        ATTR_CONFIDENTIAL_NOTE_EVENTS,
        ATTR_JOB_EVENTS,
        ATTR_PIPELINE_EVENTS,
        ATTR_WIKI_PAGE_EVENTS,
        ATTR_DEPLOYMENT_EVENTS,
        ATTR_RELEASES_EVENTS,
        ATTR_SUBGROUP_EVENTS,
    ] {
        assert!(bool_attr(&updated, name), "{name} should be enabled");
    }

    // Toggle the options back.
    let mut data = ResourceData::for_update(&schema, &updated, minimal_config(url)).unwrap();
    provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Update, &mut data, &cancel)
        .await
        .unwrap();
    let reverted = data.to_state().unwrap();

    assert_eq!(reverted, created);

    // Import matches the tracked state.
    let key = format!("{TEST_GROUP}:{}", reverted.id);
    let imported = provider
        .import_state(GROUP_HOOK_RESOURCE_TYPE, &key, &cancel)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(imported, reverted);

    // Destroy.
    let mut data = ResourceData::from_state(&reverted);
    provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Delete, &mut data, &cancel)
        .await
        .unwrap();
    assert!(fake.hook(TEST_GROUP, reverted.id.parse().unwrap()).is_none());
}

#[tokio::test]
async fn test_import_ignores_token() {
    let fake = Arc::new(FakeGitLab::new());
    let provider = Provider::new(fake.clone());
    let schema = provider.resource(GROUP_HOOK_RESOURCE_TYPE).unwrap().schema().clone();
    let cancel = CancellationToken::new();

    let mut cfg = minimal_config("https://example.com/secret-hook");
    cfg.insert(ATTR_TOKEN.to_string(), "hook-secret".into());
    let mut data = ResourceData::from_config(&schema, cfg).unwrap();
    provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Create, &mut data, &cancel)
        .await
        .unwrap();
    let tracked = data.to_state().unwrap();

    let imported = provider
        .import_state(
            GROUP_HOOK_RESOURCE_TYPE,
            &format!("{TEST_GROUP}:{}", tracked.id),
            &cancel,
        )
        .await
        .unwrap()
        .unwrap();

    assert!(imported.attributes.get(ATTR_TOKEN).is_none());
    let mut without_token = tracked.clone();
    without_token.attributes.remove(ATTR_TOKEN);
    assert_eq!(imported, without_token);
}

#[tokio::test]
async fn test_import_state_of_missing_hook_is_none() {
    let provider = Provider::new(Arc::new(FakeGitLab::new()));

    let result = provider
        .import_state(
            GROUP_HOOK_RESOURCE_TYPE,
            "group123:456",
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_import_state_rejects_malformed_key() {
    let provider = Provider::new(Arc::new(FakeGitLab::new()));

    let result = provider
        .import_state(GROUP_HOOK_RESOURCE_TYPE, "a:b:c", &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(Error::InvalidImportId { .. })));
}

#[tokio::test]
async fn test_cancelled_operation_returns_cancelled() {
    let provider = Provider::new(Arc::new(HangingClient));
    let state = ResourceState {
        id: "1".to_string(),
        attributes: minimal_config("https://example.com/slow"),
    };
    let mut data = ResourceData::from_state(&state);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Read, &mut data, &cancel)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_already_cancelled_token_skips_request() {
    let fake = Arc::new(FakeGitLab::new());
    let provider = Provider::new(fake.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut data = ResourceData::for_import("group123:456");
    let result = provider
        .run(GROUP_HOOK_RESOURCE_TYPE, Operation::Import, &mut data, &cancel)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(fake.requests().is_empty());
}
