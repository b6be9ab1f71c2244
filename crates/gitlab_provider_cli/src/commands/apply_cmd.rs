use std::{collections::BTreeMap, fmt, fs, path::Path};

use gitlab_provider::{AttributeValue, Operation, ResourceData, ResourceSchema, ResourceState};
use tracing::{debug, info, instrument, warn};

use super::Session;
use crate::errors::Error;
use crate::state::StateFile;

#[cfg(test)]
#[path = "apply_cmd_tests.rs"]
mod tests;

/// What `apply` did to bring the resource to its desired attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Created,
    Updated,
    /// An immutable attribute changed, so the resource was deleted and created again.
    Replaced,
}

impl fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Replaced => "replaced",
        };
        f.write_str(s)
    }
}

/// Reads desired attributes from a TOML file whose top-level keys are attribute names.
pub fn load_desired(path: &Path) -> Result<BTreeMap<String, AttributeValue>, Error> {
    debug!("Loading desired attributes from {:?}", path);

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {:?}: {}", path, e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse desired attributes in {:?}: {}", path, e)))
}

/// Creates, updates or replaces the resource tracked as `name`.
///
/// Returns the action taken and the resulting state, which is `None` when the object
/// disappeared while it was being read back. A create that fails after the remote object
/// was assigned an id still records it, so the next apply updates it instead of creating
/// a duplicate.
#[instrument(skip(session, desired), fields(resource_type = %session.resource_type))]
pub async fn apply(
    session: &Session,
    name: &str,
    desired: BTreeMap<String, AttributeValue>,
) -> Result<(ApplyAction, Option<ResourceState>), Error> {
    let schema = session.schema()?;
    let mut state = session.load_state()?;
    let tracked = state.get_typed(name, &session.resource_type)?.cloned();

    let (action, data) = match tracked {
        None => {
            let data = create(session, &mut state, name, &schema, desired).await?;
            (ApplyAction::Created, data)
        }
        Some(prior) => {
            let planned = schema.resolve(desired.clone())?;
            let replaced = schema.replacement_attributes(&prior.attributes, &planned);

            if replaced.is_empty() {
                let mut data = ResourceData::for_update(&schema, &prior, desired)?;
                session.run(Operation::Update, &mut data).await?;
                (ApplyAction::Updated, data)
            } else {
                info!(name, attributes = ?replaced, "Replacing resource");

                let mut old = ResourceData::from_state(&prior);
                session.run(Operation::Delete, &mut old).await?;
                state.remove(name);
                session.save_state(&state)?;

                let data = create(session, &mut state, name, &schema, desired).await?;
                (ApplyAction::Replaced, data)
            }
        }
    };

    session.record(&mut state, name, &data);
    session.save_state(&state)?;

    info!(name, %action, id = data.id(), "Applied resource");
    Ok((action, data.to_state()))
}

/// Runs a create and saves whatever id it assigned before surfacing any error.
async fn create(
    session: &Session,
    state: &mut StateFile,
    name: &str,
    schema: &ResourceSchema,
    desired: BTreeMap<String, AttributeValue>,
) -> Result<ResourceData, Error> {
    let mut data = ResourceData::from_config(schema, desired)?;
    let result = session.run(Operation::Create, &mut data).await;

    if let Err(e) = result {
        if let Some(id) = data.id() {
            // The object exists remotely even though its read-back failed.
            warn!(name, id, error = %e, "Create did not complete, tracking the new resource");
            session.record(state, name, &data);
            session.save_state(state)?;
        }
        return Err(e);
    }

    Ok(data)
}
