//! FortiManager resource descriptors
//!
//! One module per device object type. Field names and order follow the
//! FortiManager JSON API object definitions.

pub mod system_interface_ipv6;
pub mod system_sdwan_service;
pub mod wireless_controller_wtp;
pub mod ztna_web_proxy;

use fortimap_core::params::ScopeSpec;
use fortimap_core::schema::{ObjectDescriptor, SchemaError};

/// FortiManager schema configuration
///
/// Combines the object descriptor with the metadata needed to address the
/// object through the JSON API.
#[derive(Debug, Clone)]
pub struct FmgSchemaConfig {
    /// Local resource type (e.g., "system_sdwan_service")
    pub resource_type: &'static str,
    /// API object type (e.g., "SystemSdwanService")
    pub api_type_name: &'static str,
    /// Local attributes carrying the device addressing parameters
    pub scope: ScopeSpec,
    pub descriptor: ObjectDescriptor,
}

/// Returns every generated schema config
pub fn configs() -> Result<Vec<FmgSchemaConfig>, SchemaError> {
    Ok(vec![
        system_interface_ipv6::system_interface_ipv6_config()?,
        system_sdwan_service::system_sdwan_service_config()?,
        wireless_controller_wtp::wireless_controller_wtp_config()?,
        ztna_web_proxy::ztna_web_proxy_config()?,
    ])
}
