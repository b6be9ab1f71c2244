use super::*;

#[test]
fn test_invalid_import_id_message() {
    let error = Error::InvalidImportId {
        resource: "Group Hook",
        expected: "{group_id}:{hook_id}",
        key: "invalid".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Invalid Group Hook import format; expected '{group_id}:{hook_id}', got 'invalid'"
    );
}

#[test]
fn test_client_errors_are_transparent() {
    let error = Error::from(gitlab_client::Error::Api {
        status: 403,
        message: "403 Forbidden".to_string(),
    });

    assert_eq!(
        error.to_string(),
        "GitLab API request failed with status 403: 403 Forbidden"
    );
    assert!(!error.is_not_found());
}

#[test]
fn test_is_not_found_only_for_remote_404() {
    assert!(Error::from(gitlab_client::Error::NotFound).is_not_found());
    assert!(!Error::MissingResourceId.is_not_found());
    assert!(!Error::Cancelled.is_not_found());
}

#[test]
fn test_attribute_type_message() {
    let error = Error::AttributeType {
        name: "push_events".to_string(),
        expected: "bool",
    };

    assert_eq!(error.to_string(), "Attribute 'push_events' must be a bool");
}
