//! system_sdwan_service schema definition
//!
//! FortiManager object: SystemSdwanService (SD-WAN rule)

use super::FmgSchemaConfig;
use fortimap_core::params::ScopeSpec;
use fortimap_core::schema::{AttributeType, FieldDescriptor, ObjectDescriptor, SchemaError, types};

fn sla() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("SystemSdwanServiceSla")
        .field(
            FieldDescriptor::scalar("health_check", AttributeType::String)
                .with_description("SD-WAN health-check."),
        )
        .field(
            FieldDescriptor::scalar("id", AttributeType::Int)
                .with_description("SLA ID."),
        )
        .key_field("id")
        .build()
}

/// Returns the schema config for system_sdwan_service (SystemSdwanService)
pub fn system_sdwan_service_config() -> Result<FmgSchemaConfig, SchemaError> {
    let descriptor = ObjectDescriptor::builder("SystemSdwanService")
        .with_description("Create SD-WAN rules (also called services) to control how sessions are distributed to interfaces in the SD-WAN.")
        .field(
            FieldDescriptor::scalar("addr_mode", AttributeType::enumeration(&["ipv4", "ipv6"]))
                .with_description("Address mode (IPv4 or IPv6)."),
        )
        .field(FieldDescriptor::scalar("default", types::enable_disable()))
        .field(FieldDescriptor::set("dst", AttributeType::String).with_description("Destination address name."))
        .field(FieldDescriptor::scalar("dst_negate", types::enable_disable()))
        .field(FieldDescriptor::set("dst6", AttributeType::String))
        .field(FieldDescriptor::scalar("end_port", types::port()))
        .field(
            FieldDescriptor::scalar("fosid", types::positive_int())
                .with_wire_name("id")
                .computed()
                .with_description("SD-WAN rule ID (1 - 4000)."),
        )
        .field(FieldDescriptor::scalar("gateway", types::enable_disable()))
        .field(FieldDescriptor::set("groups", AttributeType::String))
        .field(FieldDescriptor::scalar("hold_down_time", AttributeType::Int))
        .field(FieldDescriptor::set("input_device", AttributeType::String))
        .field(FieldDescriptor::scalar("input_device_negate", types::enable_disable()))
        .field(FieldDescriptor::scalar("internet_service", types::enable_disable()))
        .field(FieldDescriptor::set("internet_service_custom", AttributeType::String))
        .field(FieldDescriptor::set("internet_service_name", AttributeType::String))
        .field(FieldDescriptor::scalar(
            "link_cost_factor",
            AttributeType::enumeration(&[
                "latency",
                "jitter",
                "packet-loss",
                "inbandwidth",
                "outbandwidth",
                "bibandwidth",
                "custom-profile-1",
            ]),
        ))
        .field(FieldDescriptor::scalar("link_cost_threshold", AttributeType::Int))
        .field(
            FieldDescriptor::scalar(
                "mode",
                AttributeType::enumeration(&["auto", "manual", "priority", "sla", "load-balance"]),
            )
            .with_description("Control how the SD-WAN rule sets the priority of interfaces in the SD-WAN."),
        )
        .field(
            FieldDescriptor::scalar("name", AttributeType::String)
                .with_description("SD-WAN rule name."),
        )
        .field(
            FieldDescriptor::set("priority_members", AttributeType::String)
                .with_description("Member sequence number list."),
        )
        .field(FieldDescriptor::set("priority_zone", AttributeType::String))
        .field(FieldDescriptor::scalar("protocol", AttributeType::Int))
        .field(FieldDescriptor::scalar("route_tag", AttributeType::Int))
        .field(FieldDescriptor::list("sla", sla()?))
        .field(FieldDescriptor::scalar(
            "sla_compare_method",
            AttributeType::enumeration(&["order", "number"]),
        ))
        .field(FieldDescriptor::set("src", AttributeType::String).with_description("Source address name."))
        .field(FieldDescriptor::scalar("src_negate", types::enable_disable()))
        .field(FieldDescriptor::set("src6", AttributeType::String))
        .field(FieldDescriptor::scalar("start_port", types::port()))
        .field(FieldDescriptor::scalar("status", types::enable_disable()))
        .field(
            FieldDescriptor::scalar("tos", AttributeType::String)
                .computed()
                .with_description("Type of service bit pattern."),
        )
        .field(FieldDescriptor::scalar("tos_mask", AttributeType::String).computed())
        .field(FieldDescriptor::set("users", AttributeType::String))
        .key_field("fosid")
        .build()?;

    Ok(FmgSchemaConfig {
        resource_type: "system_sdwan_service",
        api_type_name: "SystemSdwanService",
        scope: ScopeSpec::device_vdom(),
        descriptor,
    })
}
