//! Local record of the resources the CLI manages.

use std::{collections::BTreeMap, fs, path::Path};

use gitlab_provider::ResourceState;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

/// A resource tracked under a user chosen name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedResource {
    pub resource_type: String,
    pub state: ResourceState,
}

/// Contents of the JSON state file: tracked resources keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateFile {
    resources: BTreeMap<String, TrackedResource>,
}

impl StateFile {
    /// Reads the state file. A file that does not exist yet is an empty state.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            debug!("State file {:?} not found, starting empty", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::State(format!("Failed to read state file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::State(format!("Failed to parse state file: {}", e)))
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::State(format!("Failed to serialize state: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::State(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::State(format!("Failed to write state file: {}", e)))?;

        debug!(
            resources = self.resources.len(),
            "State saved to {:?}", path
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TrackedResource> {
        self.resources.get(name)
    }

    /// Returns the state tracked for `name`, checking it belongs to `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArguments` if `name` is tracked under another resource type.
    pub fn get_typed(&self, name: &str, resource_type: &str) -> Result<Option<&ResourceState>, Error> {
        match self.resources.get(name) {
            None => Ok(None),
            Some(tracked) if tracked.resource_type == resource_type => Ok(Some(&tracked.state)),
            Some(tracked) => Err(Error::InvalidArguments(format!(
                "'{name}' is tracked as a {}, not a {resource_type}",
                tracked.resource_type
            ))),
        }
    }

    pub fn insert(&mut self, name: &str, resource_type: &str, state: ResourceState) {
        self.resources.insert(
            name.to_string(),
            TrackedResource {
                resource_type: resource_type.to_string(),
                state,
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<TrackedResource> {
        self.resources.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}
