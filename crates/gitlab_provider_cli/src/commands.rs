//! Command modules for the gitlab-hooks CLI.
//!
//! Each submodule handles one group of commands:
//!
//! - `apply_cmd`: brings a named resource to the desired attributes in a TOML file
//! - `import_cmd`: adopts an existing remote object under a name
//! - `schema_cmd`: prints the schema of a resource type
//! - `state_cmd`: refresh, destroy and show for tracked resources
//!
//! All of them share a [`Session`], which ties the provider to the state file and the
//! cancellation token that Ctrl-C triggers.

use std::path::PathBuf;

use gitlab_provider::{
    CancellationToken, Operation, Provider, ResourceData, ResourceSchema,
};

use crate::errors::Error;
use crate::state::StateFile;

pub mod apply_cmd;
pub mod import_cmd;
pub mod schema_cmd;
pub mod state_cmd;

#[cfg(test)]
mod test_support;

/// Everything a command needs to run against one resource type.
pub struct Session {
    pub provider: Provider,
    pub resource_type: String,
    pub state_path: PathBuf,
    pub cancel: CancellationToken,
}

impl Session {
    pub fn new(
        provider: Provider,
        resource_type: impl Into<String>,
        state_path: impl Into<PathBuf>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            provider,
            resource_type: resource_type.into(),
            state_path: state_path.into(),
            cancel,
        }
    }

    pub fn schema(&self) -> Result<ResourceSchema, Error> {
        Ok(self
            .provider
            .resource(&self.resource_type)?
            .schema()
            .clone())
    }

    pub fn load_state(&self) -> Result<StateFile, Error> {
        StateFile::load(&self.state_path)
    }

    pub fn save_state(&self, state: &StateFile) -> Result<(), Error> {
        state.save(&self.state_path)
    }

    async fn run(&self, operation: Operation, data: &mut ResourceData) -> Result<(), Error> {
        self.provider
            .run(&self.resource_type, operation, data, &self.cancel)
            .await?;
        Ok(())
    }

    /// Records the outcome of an operation: the new state, or removal if the object is gone.
    fn record(&self, state: &mut StateFile, name: &str, data: &ResourceData) {
        match data.to_state() {
            Some(resource_state) => state.insert(name, &self.resource_type, resource_state),
            None => {
                state.remove(name);
            }
        }
    }
}

fn not_tracked(name: &str) -> Error {
    Error::InvalidArguments(format!("no resource named '{name}' is tracked"))
}
