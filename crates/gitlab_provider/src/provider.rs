//! The provider: a registry of resource types and the entry point for running operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use gitlab_client::{ClientConfig, GitLabClient, GroupHookClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::errors::{Error, ProviderResult};
use crate::group_hook_resource::{GroupHookResource, GROUP_HOOK_RESOURCE_TYPE};
use crate::resource::{Operation, Resource};
use crate::resource_data::{ResourceData, ResourceState};

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

/// Holds every resource type the provider manages, keyed by type name.
///
/// The table is built once in [`Provider::new`]; nothing registers itself at load time.
pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
}

impl Provider {
    /// Creates a provider whose resources talk to GitLab through `client`.
    pub fn new(client: Arc<dyn GroupHookClient>) -> Self {
        let mut resources: BTreeMap<&'static str, Arc<dyn Resource>> = BTreeMap::new();
        resources.insert(
            GROUP_HOOK_RESOURCE_TYPE,
            Arc::new(GroupHookResource::new(client)),
        );

        debug!(
            resource_types = ?resources.keys().collect::<Vec<_>>(),
            "Initialized provider"
        );

        Self { resources }
    }

    /// Creates a provider backed by an HTTP client built from `config`.
    ///
    /// # Errors
    /// Returns `Error::Client` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> ProviderResult<Self> {
        let client = GitLabClient::new(config)?;
        info!(base_url = %client.base_url(), "Configured GitLab provider");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn resource(&self, type_name: &str) -> ProviderResult<Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::UnknownResourceType(type_name.to_string()))
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Runs a single lifecycle operation.
    ///
    /// If `cancel` fires first the in-flight request is dropped and `Error::Cancelled` is
    /// returned; `data` may then hold a partially applied result and should be discarded.
    #[instrument(skip(self, data, cancel), fields(id = data.id()))]
    pub async fn run(
        &self,
        type_name: &str,
        operation: Operation,
        data: &mut ResourceData,
        cancel: &CancellationToken,
    ) -> ProviderResult<()> {
        let resource = self.resource(type_name)?;

        debug!(resource_type = type_name, %operation, "Running operation");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(resource_type = type_name, %operation, "Operation cancelled");
                return Err(Error::Cancelled);
            }
            result = dispatch(resource.as_ref(), operation, data) => result,
        };

        if let Err(e) = &result {
            warn!(resource_type = type_name, %operation, error = %e, "Operation failed");
        }
        result
    }

    /// Adopts an existing remote object, the way a host runtime does: import followed by read.
    ///
    /// Returns `None` if the imported object turns out not to exist.
    pub async fn import_state(
        &self,
        type_name: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> ProviderResult<Option<ResourceState>> {
        let mut data = ResourceData::for_import(key);
        self.run(type_name, Operation::Import, &mut data, cancel)
            .await?;
        self.run(type_name, Operation::Read, &mut data, cancel)
            .await?;
        Ok(data.to_state())
    }
}

async fn dispatch(
    resource: &dyn Resource,
    operation: Operation,
    data: &mut ResourceData,
) -> ProviderResult<()> {
    match operation {
        Operation::Create => resource.create(data).await,
        Operation::Read => resource.read(data).await,
        Operation::Update => resource.update(data).await,
        Operation::Delete => resource.delete(data).await,
        Operation::Import => resource.import(data).await,
    }
}
