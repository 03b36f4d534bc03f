//! fortimap FortiManager Provider
//!
//! Device configuration objects managed through FortiManager.
//!
//! ## Module Structure
//!
//! - `resources` - Resource type catalogue and adapters
//! - `provider` - FmgProvider implementation
//! - `schemas` - Object descriptors, one per FortiManager object type
//! - `utils` - Validators for FortiOS value formats

pub mod provider;
pub mod resources;
pub mod schemas;
pub mod utils;

// Re-export main types
pub use provider::FmgProvider;
pub use resources::EXEC_WORKSPACE_ACTION;

use fortimap_core::adapter::ReadOutcome;
use fortimap_core::client::ConfigClient;
use fortimap_core::error::ProviderResult;
use fortimap_core::provider::{BoxFuture, Provider};
use fortimap_core::resource::ResourceData;
use fortimap_core::schema::ObjectDescriptor;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl<C: ConfigClient> Provider for FmgProvider<C> {
    fn name(&self) -> &'static str {
        "fortimanager"
    }

    fn resource_types(&self) -> Vec<&str> {
        self.resource_type_names()
    }

    fn schema(&self, resource_type: &str) -> Option<&ObjectDescriptor> {
        self.descriptor(resource_type)
    }

    fn read<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<ReadOutcome>> {
        Box::pin(async move { self.read_resource(data).await })
    }

    fn create<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move { self.create_resource(data).await })
    }

    fn update<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move { self.update_resource(data).await })
    }

    fn delete<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move { self.delete_resource(data).await })
    }

    fn import<'a>(
        &'a self,
        resource_type: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<ResourceData>>> {
        Box::pin(async move { self.import_resource(resource_type, id).await })
    }
}
