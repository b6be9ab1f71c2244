//! Commands that act on resources already tracked in the state file.

use gitlab_provider::{Operation, ResourceData, ResourceSchema, ResourceState};
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use super::{not_tracked, Session};
use crate::errors::Error;

#[cfg(test)]
#[path = "state_cmd_tests.rs"]
mod tests;

/// Placeholder shown instead of sensitive attribute values.
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive value)";

/// Reconciles the tracked state of `name` with the remote object.
///
/// Returns `None`, and stops tracking the resource, if the object no longer exists.
#[instrument(skip(session), fields(resource_type = %session.resource_type))]
pub async fn refresh(session: &Session, name: &str) -> Result<Option<ResourceState>, Error> {
    let mut state = session.load_state()?;
    let tracked = state
        .get_typed(name, &session.resource_type)?
        .cloned()
        .ok_or_else(|| not_tracked(name))?;

    let mut data = ResourceData::from_state(&tracked);
    session.run(Operation::Read, &mut data).await?;

    session.record(&mut state, name, &data);
    session.save_state(&state)?;

    let refreshed = data.to_state();
    if refreshed.is_none() {
        warn!(name, id = %tracked.id, "Resource no longer exists and was removed from state");
    }
    Ok(refreshed)
}

/// Deletes the remote object and stops tracking it.
///
/// The resource stays tracked if the delete fails, including when the object is already gone.
#[instrument(skip(session), fields(resource_type = %session.resource_type))]
pub async fn destroy(session: &Session, name: &str) -> Result<(), Error> {
    let mut state = session.load_state()?;
    let tracked = state
        .get_typed(name, &session.resource_type)?
        .cloned()
        .ok_or_else(|| not_tracked(name))?;

    let mut data = ResourceData::from_state(&tracked);
    session.run(Operation::Delete, &mut data).await?;

    state.remove(name);
    session.save_state(&state)?;

    info!(name, id = %tracked.id, "Destroyed resource");
    Ok(())
}

/// Returns the tracked state of `name` as JSON, with sensitive values masked.
pub fn show(session: &Session, name: &str) -> Result<Value, Error> {
    let state = session.load_state()?;
    let tracked = match state.get_typed(name, &session.resource_type)? {
        Some(tracked) => tracked,
        None => {
            let known = state.names().collect::<Vec<_>>().join(", ");
            return Err(Error::InvalidArguments(format!(
                "no resource named '{name}' is tracked (tracked: [{known}])"
            )));
        }
    };

    Ok(masked(&session.schema()?, tracked))
}

/// Renders `state` as JSON, replacing the values of sensitive attributes.
///
/// Empty sensitive values are shown as they are, since they reveal nothing.
pub fn masked(schema: &ResourceSchema, state: &ResourceState) -> Value {
    let attributes: Map<String, Value> = state
        .attributes
        .iter()
        .map(|(name, value)| {
            let is_empty = value.as_str().is_some_and(str::is_empty);
            let rendered = if schema.is_sensitive(name) && !is_empty {
                Value::from(SENSITIVE_PLACEHOLDER)
            } else {
                json!(value)
            };
            (name.clone(), rendered)
        })
        .collect();

    json!({ "id": state.id, "attributes": attributes })
}
