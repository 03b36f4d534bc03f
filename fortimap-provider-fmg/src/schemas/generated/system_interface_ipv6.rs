//! system_interface_ipv6 schema definition
//!
//! FortiManager object: SystemInterfaceIpv6 (per-interface IPv6 settings)

use super::FmgSchemaConfig;
use crate::utils;
use fortimap_core::params::ScopeSpec;
use fortimap_core::schema::{AttributeType, FieldDescriptor, ObjectDescriptor, SchemaError, types};
use fortimap_core::transform;

fn ip6_extra_addr() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("SystemInterfaceIpv6Ip6ExtraAddr")
        .field(
            FieldDescriptor::scalar("prefix", types::ipv6_prefix())
                .with_description("IPv6 address prefix."),
        )
        .key_field("prefix")
        .build()
}

fn ip6_prefix_list() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("SystemInterfaceIpv6Ip6PrefixList")
        .field(FieldDescriptor::scalar("autonomous_flag", types::enable_disable()))
        .field(
            FieldDescriptor::set("dnssl", AttributeType::String)
                .with_description("DNS search list option."),
        )
        .field(FieldDescriptor::scalar("onlink_flag", types::enable_disable()))
        .field(FieldDescriptor::scalar("preferred_life_time", AttributeType::Int))
        .field(
            FieldDescriptor::scalar("prefix", types::ipv6_prefix())
                .required()
                .with_description("IPv6 prefix."),
        )
        .field(FieldDescriptor::set("rdnss", AttributeType::String))
        .field(FieldDescriptor::scalar("valid_life_time", AttributeType::Int))
        .key_field("prefix")
        .build()
}

fn vrrp6() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("SystemInterfaceIpv6Vrrp6")
        .field(FieldDescriptor::scalar("accept_mode", types::enable_disable()))
        .field(FieldDescriptor::scalar("adv_interval", AttributeType::Int))
        .field(FieldDescriptor::scalar("preempt", types::enable_disable()))
        .field(FieldDescriptor::scalar("priority", AttributeType::Int))
        .field(FieldDescriptor::scalar("start_time", AttributeType::Int))
        .field(FieldDescriptor::scalar("status", types::enable_disable()))
        .field(FieldDescriptor::set("vrdst6", AttributeType::String))
        .field(FieldDescriptor::scalar("vrgrp", AttributeType::Int))
        .field(
            FieldDescriptor::scalar("vrid", utils::vrid())
                .required()
                .with_description("Virtual router identifier (1 - 255)."),
        )
        .field(
            FieldDescriptor::scalar("vrip6", AttributeType::String)
                .with_description("IPv6 address of the virtual router."),
        )
        .key_field("vrid")
        .build()
}

/// Returns the schema config for system_interface_ipv6 (SystemInterfaceIpv6)
pub fn system_interface_ipv6_config() -> Result<FmgSchemaConfig, SchemaError> {
    let descriptor = ObjectDescriptor::builder("SystemInterfaceIpv6")
        .with_description("IPv6 of interface.")
        .field(
            FieldDescriptor::scalar("autoconf", types::enable_disable())
                .with_transform(transform::enable_flag())
                .with_description("Enable/disable address auto config."),
        )
        .field(FieldDescriptor::scalar("cli_conn6_status", AttributeType::Int).computed())
        .field(FieldDescriptor::scalar("dhcp6_prefix_delegation", types::enable_disable()))
        .field(FieldDescriptor::scalar("dhcp6_relay_ip", AttributeType::String))
        .field(FieldDescriptor::scalar("dhcp6_relay_service", types::enable_disable()))
        .field(
            FieldDescriptor::scalar("ip6_address", types::ipv6_prefix())
                .with_description("Primary IPv6 address prefix. Syntax: xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xxxx/xxx"),
        )
        .field(
            FieldDescriptor::set(
                "ip6_allowaccess",
                AttributeType::enumeration(&["https", "ping", "ssh", "snmp", "http", "telnet", "fgfm", "capwap"]),
            )
            .with_description("Allow management access to the interface."),
        )
        .field(FieldDescriptor::scalar("ip6_default_life", AttributeType::Int))
        .field(FieldDescriptor::list("ip6_extra_addr", ip6_extra_addr()?))
        .field(FieldDescriptor::scalar("ip6_hop_limit", utils::hop_limit()))
        .field(FieldDescriptor::scalar("ip6_link_mtu", utils::mtu()))
        .field(FieldDescriptor::scalar("ip6_manage_flag", types::enable_disable()))
        .field(FieldDescriptor::scalar("ip6_max_interval", AttributeType::Int))
        .field(FieldDescriptor::scalar("ip6_min_interval", AttributeType::Int))
        .field(
            FieldDescriptor::scalar(
                "ip6_mode",
                AttributeType::enumeration(&["static", "dhcp", "pppoe", "delegated"]),
            )
            .with_default("static")
            .with_description("Addressing mode (static, DHCP, delegated)."),
        )
        .field(FieldDescriptor::scalar("ip6_other_flag", types::enable_disable()))
        .field(FieldDescriptor::list("ip6_prefix_list", ip6_prefix_list()?))
        .field(FieldDescriptor::scalar("ip6_reachable_time", AttributeType::Int))
        .field(FieldDescriptor::scalar("ip6_retrans_time", AttributeType::Int))
        .field(
            FieldDescriptor::scalar("ip6_send_adv", types::enable_disable())
                .with_transform(transform::enable_flag())
                .with_description("Enable/disable sending advertisements about the interface."),
        )
        .field(FieldDescriptor::scalar("ip6_subnet", types::ipv6_prefix()).computed())
        .field(
            FieldDescriptor::scalar("ip6_upstream_interface", AttributeType::String)
                .with_transform(transform::single_ref())
                .with_description("Interface name providing delegated information."),
        )
        .field(FieldDescriptor::scalar(
            "nd_mode",
            AttributeType::enumeration(&["basic", "SEND-compatible"]),
        ))
        .field(FieldDescriptor::list("vrrp6", vrrp6()?))
        .build()?;

    Ok(FmgSchemaConfig {
        resource_type: "system_interface_ipv6",
        api_type_name: "SystemInterfaceIpv6",
        scope: ScopeSpec::device_interface(),
        descriptor,
    })
}
