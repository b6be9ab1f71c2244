//! The lifecycle contract every managed resource type implements.

use std::fmt;

use async_trait::async_trait;

use crate::errors::ProviderResult;
use crate::resource_data::ResourceData;
use crate::schema::ResourceSchema;

/// Lifecycle operations a host runtime can invoke on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource type managed by the provider.
///
/// Each operation performs at most one remote request, plus the read that follows a create or
/// update, and writes its outcome back into the supplied [`ResourceData`].
#[async_trait]
pub trait Resource: Send + Sync {
    /// Name the resource type is registered under, e.g. `gitlab_group_hook`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> &ResourceSchema;

    /// Creates the remote object and assigns the resource id.
    async fn create(&self, data: &mut ResourceData) -> ProviderResult<()>;

    /// Refreshes every readable attribute from the remote object.
    ///
    /// If the remote object no longer exists the id is cleared and `Ok(())` is returned.
    async fn read(&self, data: &mut ResourceData) -> ProviderResult<()>;

    /// Brings the remote object in line with the data's attribute values.
    async fn update(&self, data: &mut ResourceData) -> ProviderResult<()>;

    /// Removes the remote object.
    async fn delete(&self, data: &mut ResourceData) -> ProviderResult<()>;

    /// Turns an import key held in the id into a resource id plus identifying attributes.
    ///
    /// The remaining attributes are expected to be filled in by a subsequent read.
    async fn import(&self, data: &mut ResourceData) -> ProviderResult<()>;
}
