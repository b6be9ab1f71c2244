//! Provider for managing GitLab resources declaratively.
//!
//! The provider exposes resource types through a schema and a small set of lifecycle
//! operations (create, read, update, delete and import). A host runtime, such as the
//! `gitlab-hooks` command line tool, owns the desired configuration and the tracked state and
//! calls into the provider to reconcile the two.
//!
//! ## Architecture
//!
//! - [`schema`] describes the attributes a resource type accepts
//! - [`ResourceData`] carries the identity and attribute values through one operation
//! - [`Resource`] is the lifecycle contract each resource type implements
//! - [`Provider`] maps resource type names to their implementation
//!
//! Currently a single resource type is provided: [`GroupHookResource`] (`gitlab_group_hook`).

pub mod errors;
pub use errors::{Error, ProviderResult};

pub mod group_hook_resource;
pub use group_hook_resource::{GroupHookResource, ImportId, GROUP_HOOK_RESOURCE_TYPE};

pub mod provider;
pub use provider::Provider;

pub mod resource;
pub use resource::{Operation, Resource};

pub mod resource_data;
pub use resource_data::{ResourceData, ResourceState};

pub mod schema;
pub use schema::{Attribute, AttributeType, AttributeValue, ResourceSchema};

pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod test_support;
