//! wireless_controller_wtp schema definition
//!
//! FortiManager object: WirelessControllerWtp (managed FortiAP)

use super::FmgSchemaConfig;
use crate::utils;
use fortimap_core::params::ScopeSpec;
use fortimap_core::schema::{AttributeType, FieldDescriptor, ObjectDescriptor, SchemaError, types};
use fortimap_core::transform;

fn radio(name: &str) -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder(name)
        .field(FieldDescriptor::scalar("auto_power_high", AttributeType::Int))
        .field(
            FieldDescriptor::scalar("auto_power_level", types::enable_disable())
                .with_description("Enable/disable automatic power level adjustment."),
        )
        .field(FieldDescriptor::scalar("auto_power_low", AttributeType::Int))
        .field(FieldDescriptor::scalar("band", AttributeType::String))
        .field(FieldDescriptor::set("channel", AttributeType::String))
        .field(FieldDescriptor::scalar(
            "drma_manual_mode",
            AttributeType::enumeration(&["ap", "monitor", "ncf", "ncf-peek"]),
        ))
        .field(FieldDescriptor::scalar("override_analysis", types::enable_disable()))
        .field(FieldDescriptor::scalar("override_band", types::enable_disable()))
        .field(FieldDescriptor::scalar("override_channel", types::enable_disable()))
        .field(FieldDescriptor::scalar("override_txpower", types::enable_disable()))
        .field(FieldDescriptor::scalar("override_vaps", types::enable_disable()))
        .field(
            FieldDescriptor::scalar("power_level", utils::percent())
                .with_description("Radio EIRP power level as a percentage of the maximum EIRP power (0 - 100)."),
        )
        .field(FieldDescriptor::scalar("radio_id", AttributeType::Int).computed())
        .field(FieldDescriptor::scalar(
            "spectrum_analysis",
            AttributeType::enumeration(&["enable", "scan-only", "disable"]),
        ))
        .field(FieldDescriptor::scalar(
            "vap_all",
            AttributeType::enumeration(&["tunnel", "bridge", "manual"]),
        ))
        .field(FieldDescriptor::set("vaps", AttributeType::String))
        .build()
}

fn lan() -> Result<ObjectDescriptor, SchemaError> {
    let port_mode = || AttributeType::enumeration(&["offline", "nat-to-wan", "bridge-to-wan", "bridge-to-ssid"]);

    ObjectDescriptor::builder("WirelessControllerWtpLan")
        .field(FieldDescriptor::scalar("port_esl_mode", port_mode()))
        .field(
            FieldDescriptor::scalar("port_esl_ssid", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .field(
            FieldDescriptor::scalar("port_mode", port_mode())
                .with_description("LAN port mode."),
        )
        .field(
            FieldDescriptor::scalar("port_ssid", AttributeType::String)
                .with_transform(transform::single_ref())
                .with_description("Bridge LAN port to SSID."),
        )
        .field(FieldDescriptor::scalar("port1_mode", port_mode()))
        .field(
            FieldDescriptor::scalar("port1_ssid", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .field(FieldDescriptor::scalar("port2_mode", port_mode()))
        .field(
            FieldDescriptor::scalar("port2_ssid", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .build()
}

fn split_tunneling_acl() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("WirelessControllerWtpSplitTunnelingAcl")
        .field(
            FieldDescriptor::scalar("dest_ip", utils::ip_mask())
                .with_transform(transform::space_list())
                .with_description("Destination IP and mask for the split-tunneling subnet."),
        )
        .field(FieldDescriptor::scalar("id", AttributeType::Int))
        .key_field("id")
        .build()
}

/// Returns the schema config for wireless_controller_wtp (WirelessControllerWtp)
pub fn wireless_controller_wtp_config() -> Result<FmgSchemaConfig, SchemaError> {
    let descriptor = ObjectDescriptor::builder("WirelessControllerWtp")
        .with_description("Configure Wireless Termination Points (WTPs), that is, FortiAPs or APs to be managed by FortiGate.")
        .field(
            FieldDescriptor::scalar(
                "admin",
                AttributeType::enumeration(&["discovered", "disable", "enable"]),
            )
            .with_description("Configure how the FortiGate operating as a wireless controller discovers and manages this WTP, AP or FortiAP."),
        )
        .field(FieldDescriptor::scalar("coordinate_latitude", AttributeType::String))
        .field(FieldDescriptor::scalar("coordinate_longitude", AttributeType::String))
        .field(FieldDescriptor::scalar("firmware_provision", AttributeType::String))
        .field(FieldDescriptor::scalar("image_download", types::enable_disable()))
        .field(FieldDescriptor::scalar("index", AttributeType::Int).computed())
        .field(FieldDescriptor::set(
            "ip_fragment_preventing",
            AttributeType::enumeration(&["tcp-mss-adjust", "icmp-unreachable"]),
        ))
        .field(FieldDescriptor::single("lan", lan()?))
        .field(FieldDescriptor::scalar("led_state", types::enable_disable()))
        .field(FieldDescriptor::scalar("location", AttributeType::String))
        .field(
            FieldDescriptor::scalar("login_passwd", AttributeType::String)
                .sensitive()
                .with_description("Set the managed WTP, FortiAP, or AP's administrator password."),
        )
        .field(FieldDescriptor::scalar(
            "login_passwd_change",
            AttributeType::enumeration(&["yes", "default", "no"]),
        ))
        .field(FieldDescriptor::scalar(
            "mesh_bridge_enable",
            AttributeType::enumeration(&["default", "enable", "disable"]),
        ))
        .field(
            FieldDescriptor::scalar("name", AttributeType::String)
                .with_description("WTP, AP or FortiAP configuration name."),
        )
        .field(FieldDescriptor::scalar("override_led_state", types::enable_disable()))
        .field(FieldDescriptor::scalar("override_wan_port_mode", types::enable_disable()))
        .field(FieldDescriptor::single("radio_1", radio("WirelessControllerWtpRadio1")?))
        .field(FieldDescriptor::single("radio_2", radio("WirelessControllerWtpRadio2")?))
        .field(FieldDescriptor::scalar("region", AttributeType::String))
        .field(FieldDescriptor::scalar("region_x", AttributeType::String))
        .field(FieldDescriptor::scalar("region_y", AttributeType::String))
        .field(FieldDescriptor::list("split_tunneling_acl", split_tunneling_acl()?))
        .field(FieldDescriptor::scalar("split_tunneling_acl_local_ap_subnet", types::enable_disable()))
        .field(FieldDescriptor::scalar(
            "split_tunneling_acl_path",
            AttributeType::enumeration(&["tunnel", "local"]),
        ))
        .field(FieldDescriptor::scalar("tun_mtu_downlink", AttributeType::Int))
        .field(FieldDescriptor::scalar("tun_mtu_uplink", AttributeType::Int))
        .field(FieldDescriptor::scalar("uuid", AttributeType::String).computed())
        .field(FieldDescriptor::scalar(
            "wan_port_mode",
            AttributeType::enumeration(&["wan-lan", "wan-only"]),
        ))
        .field(
            FieldDescriptor::scalar("wtp_id", utils::wtp_id())
                .required()
                .with_description("WTP ID."),
        )
        .field(
            FieldDescriptor::scalar("wtp_mode", AttributeType::enumeration(&["normal", "remote"]))
                .with_description("WTP, AP, or FortiAP operating mode."),
        )
        .field(
            FieldDescriptor::scalar("wtp_profile", AttributeType::String)
                .with_transform(transform::single_ref())
                .with_description("WTP profile name to apply to this WTP, AP or FortiAP."),
        )
        .key_field("wtp_id")
        .build()?;

    Ok(FmgSchemaConfig {
        resource_type: "wireless_controller_wtp",
        api_type_name: "WirelessControllerWtp",
        scope: ScopeSpec::device_vdom(),
        descriptor,
    })
}
