use gitlab_provider::ResourceState;
use tracing::{info, instrument};

use super::Session;
use crate::errors::Error;

#[cfg(test)]
#[path = "import_cmd_tests.rs"]
mod tests;

/// Adopts the remote object identified by `key` and tracks it as `name`.
///
/// # Errors
///
/// Returns `Error::InvalidArguments` if `name` is already tracked or no object matches `key`.
#[instrument(skip(session), fields(resource_type = %session.resource_type))]
pub async fn import(session: &Session, name: &str, key: &str) -> Result<ResourceState, Error> {
    let mut state = session.load_state()?;
    if state.get(name).is_some() {
        return Err(Error::InvalidArguments(format!(
            "'{name}' is already tracked; destroy it or choose another name"
        )));
    }

    let imported = session
        .provider
        .import_state(&session.resource_type, key, &session.cancel)
        .await?
        .ok_or_else(|| {
            Error::InvalidArguments(format!(
                "no {} exists for import key '{key}'",
                session.resource_type
            ))
        })?;

    state.insert(name, &session.resource_type, imported.clone());
    session.save_state(&state)?;

    info!(name, id = %imported.id, "Imported resource");
    Ok(imported)
}
