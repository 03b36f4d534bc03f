//! Resource type catalogue
//!
//! Maps each local resource type to the adapter that binds its descriptor to
//! the FortiManager object API.

use fortimap_core::adapter::ResourceAdapter;
use fortimap_core::schema::SchemaError;
use fortimap_core::workspace::WorkspaceActionResource;

use crate::schemas::generated;

/// Lock/commit/unlock pseudo-resource
pub const EXEC_WORKSPACE_ACTION: &str = WorkspaceActionResource::RESOURCE_TYPE;

/// Returns an adapter for every device object type
pub fn adapters() -> Result<Vec<ResourceAdapter>, SchemaError> {
    Ok(generated::configs()?
        .into_iter()
        .map(|config| {
            ResourceAdapter::new(
                config.resource_type,
                config.api_type_name,
                config.descriptor,
                config.scope,
            )
        })
        .collect())
}
