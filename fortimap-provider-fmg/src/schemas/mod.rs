//! FortiManager resource schema definitions

pub mod generated;

pub use generated::FmgSchemaConfig;

use fortimap_core::schema::{ObjectDescriptor, SchemaError};

/// Returns every FortiManager object descriptor
pub fn all_descriptors() -> Result<Vec<ObjectDescriptor>, SchemaError> {
    Ok(generated::configs()?
        .into_iter()
        .map(|config| config.descriptor)
        .collect())
}
