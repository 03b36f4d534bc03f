//! Provider - Trait abstracting resource operations
//!
//! A Provider serves a catalogue of resource types against one managed
//! system. It owns the client and configuration and dispatches each
//! lifecycle verb to the adapter registered for the resource's type.

use std::future::Future;
use std::pin::Pin;

use crate::adapter::ReadOutcome;
use crate::error::ProviderResult;
use crate::resource::ResourceData;
use crate::schema::ObjectDescriptor;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Main Provider trait
///
/// Every verb works on a [`ResourceData`] in place: identity and state are
/// set on success and cleared when the remote object is gone.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "fortimanager")
    fn name(&self) -> &'static str;

    /// Resource types this Provider can handle
    fn resource_types(&self) -> Vec<&str>;

    /// Field schema of a resource type
    fn schema(&self, resource_type: &str) -> Option<&ObjectDescriptor>;

    /// Refresh state from the remote object
    ///
    /// Returns [`ReadOutcome::Gone`] (not an error) if it no longer exists.
    fn read<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<ReadOutcome>>;

    fn create<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>>;

    fn update<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>>;

    fn delete<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>>;

    /// Adopt an existing remote object; `None` if it does not exist
    fn import<'a>(
        &'a self,
        resource_type: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<ResourceData>>>;
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<&str> {
        (**self).resource_types()
    }

    fn schema(&self, resource_type: &str) -> Option<&ObjectDescriptor> {
        (**self).schema(resource_type)
    }

    fn read<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<ReadOutcome>> {
        (**self).read(data)
    }

    fn create<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>> {
        (**self).create(data)
    }

    fn update<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>> {
        (**self).update(data)
    }

    fn delete<'a>(&'a self, data: &'a mut ResourceData) -> BoxFuture<'a, ProviderResult<()>> {
        (**self).delete(data)
    }

    fn import<'a>(
        &'a self,
        resource_type: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<ResourceData>>> {
        (**self).import(resource_type, id)
    }
}
