//! ztna_web_proxy schema definition
//!
//! FortiManager object: ZtnaWebProxy (ZTNA web-proxy)

use super::FmgSchemaConfig;
use crate::utils;
use fortimap_core::params::ScopeSpec;
use fortimap_core::schema::{AttributeType, FieldDescriptor, ObjectDescriptor, SchemaError, types};
use fortimap_core::transform;

const TLS_VERSIONS: &[&str] = &["tls-1.0", "tls-1.1", "tls-1.2", "tls-1.3"];

fn realservers() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("ZtnaWebProxyApiGatewayRealservers")
        .field(FieldDescriptor::scalar("addr_type", AttributeType::enumeration(&["ip", "fqdn"])))
        .field(
            FieldDescriptor::scalar("address", AttributeType::String)
                .with_transform(transform::single_ref())
                .with_description("Address or address group of the real server."),
        )
        .field(FieldDescriptor::scalar("health_check", types::enable_disable()))
        .field(FieldDescriptor::scalar(
            "health_check_proto",
            AttributeType::enumeration(&["ping", "http", "tcp-connect"]),
        ))
        .field(FieldDescriptor::scalar("holddown_interval", types::enable_disable()))
        .field(FieldDescriptor::scalar("http_host", AttributeType::String))
        .field(FieldDescriptor::scalar("id", AttributeType::Int).with_description("Real server ID."))
        .field(FieldDescriptor::scalar("ip", AttributeType::String))
        .field(FieldDescriptor::scalar("port", types::port()))
        .field(FieldDescriptor::scalar(
            "status",
            AttributeType::enumeration(&["active", "standby", "disable"]),
        ))
        .field(FieldDescriptor::scalar("translate_host", types::enable_disable()))
        .field(FieldDescriptor::scalar("verify_cert", types::enable_disable()))
        .field(FieldDescriptor::scalar("weight", AttributeType::Int))
        .key_field("id")
        .build()
}

fn ssl_cipher_suites() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("ZtnaWebProxyApiGatewaySslCipherSuites")
        .field(
            FieldDescriptor::scalar("cipher", AttributeType::String)
                .with_description("Cipher suite name."),
        )
        .field(FieldDescriptor::scalar("priority", AttributeType::Int))
        .field(FieldDescriptor::set("versions", AttributeType::enumeration(TLS_VERSIONS)))
        .key_field("priority")
        .build()
}

fn quic() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("ZtnaWebProxyApiGatewayQuic")
        .field(FieldDescriptor::scalar("ack_delay_exponent", AttributeType::Int))
        .field(FieldDescriptor::scalar("active_connection_id_limit", AttributeType::Int))
        .field(FieldDescriptor::scalar("active_migration", types::enable_disable()))
        .field(FieldDescriptor::scalar("grease_quic_bit", types::enable_disable()))
        .field(FieldDescriptor::scalar("max_ack_delay", AttributeType::Int))
        .field(FieldDescriptor::scalar("max_datagram_frame_size", AttributeType::Int))
        .field(
            FieldDescriptor::scalar("max_idle_timeout", AttributeType::Int)
                .with_description("Maximum idle timeout in milliseconds."),
        )
        .field(FieldDescriptor::scalar("max_udp_payload_size", AttributeType::Int))
        .build()
}

fn api_gateway() -> Result<ObjectDescriptor, SchemaError> {
    ObjectDescriptor::builder("ZtnaWebProxyApiGateway")
        .field(FieldDescriptor::scalar("h2_support", types::enable_disable()))
        .field(FieldDescriptor::scalar("h3_support", types::enable_disable()))
        .field(FieldDescriptor::scalar("http_cookie_age", AttributeType::Int))
        .field(FieldDescriptor::scalar("http_cookie_domain", AttributeType::String))
        .field(FieldDescriptor::scalar("http_cookie_domain_from_host", types::enable_disable()))
        .field(FieldDescriptor::scalar("http_cookie_generation", AttributeType::Int).computed())
        .field(FieldDescriptor::scalar("http_cookie_path", AttributeType::String))
        .field(FieldDescriptor::scalar(
            "http_cookie_share",
            AttributeType::enumeration(&["disable", "same-ip"]),
        ))
        .field(FieldDescriptor::scalar("https_cookie_secure", types::enable_disable()))
        .field(FieldDescriptor::scalar("id", AttributeType::Int).with_description("API Gateway ID."))
        .field(
            FieldDescriptor::scalar(
                "ldb_method",
                AttributeType::enumeration(&["static", "round-robin", "weighted", "first-alive", "http-host"]),
            )
            .with_description("Method used to distribute sessions to real servers."),
        )
        .field(FieldDescriptor::scalar(
            "persistence",
            AttributeType::enumeration(&["none", "http-cookie"]),
        ))
        .field(FieldDescriptor::single("quic", quic()?))
        .field(FieldDescriptor::list("realservers", realservers()?))
        .field(FieldDescriptor::scalar("service", AttributeType::enumeration(&["http", "https"])))
        .field(FieldDescriptor::scalar(
            "ssl_algorithm",
            AttributeType::enumeration(&["high", "medium", "low"]),
        ))
        .field(FieldDescriptor::list("ssl_cipher_suites", ssl_cipher_suites()?))
        .field(FieldDescriptor::scalar(
            "ssl_dh_bits",
            AttributeType::enumeration(&["768", "1024", "1536", "2048", "3072", "4096"]),
        ))
        .field(FieldDescriptor::scalar("ssl_max_version", AttributeType::enumeration(TLS_VERSIONS)))
        .field(FieldDescriptor::scalar("ssl_min_version", AttributeType::enumeration(TLS_VERSIONS)))
        .field(FieldDescriptor::scalar("ssl_renegotiation", types::enable_disable()))
        .field(
            FieldDescriptor::scalar("ssl_vpn_web_portal", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .field(
            FieldDescriptor::scalar("url_map", AttributeType::String)
                .with_default("/")
                .with_description("URL pattern to match."),
        )
        .field(FieldDescriptor::scalar(
            "url_map_type",
            AttributeType::enumeration(&["sub-string", "wildcard", "regex"]),
        ))
        .key_field("id")
        .build()
}

/// Returns the schema config for ztna_web_proxy (ZtnaWebProxy)
pub fn ztna_web_proxy_config() -> Result<FmgSchemaConfig, SchemaError> {
    let descriptor = ObjectDescriptor::builder("ZtnaWebProxy")
        .with_description("Configure ZTNA web-proxy.")
        .field(FieldDescriptor::list("api_gateway", api_gateway()?))
        .field(FieldDescriptor::scalar("auth_portal", types::enable_disable()))
        .field(
            FieldDescriptor::scalar("auth_virtual_host", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .field(
            FieldDescriptor::scalar("decrypted_traffic_mirror", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .field(
            FieldDescriptor::scalar("host", AttributeType::String)
                .with_transform(transform::single_ref())
                .with_description("Virtual or real host name."),
        )
        .field(FieldDescriptor::scalar("log_blocked_traffic", types::enable_disable()))
        .field(
            FieldDescriptor::scalar("name", utils::object_name())
                .required()
                .with_description("ZTNA proxy name."),
        )
        .field(FieldDescriptor::scalar("svr_pool_multiplex", types::enable_disable()))
        .field(FieldDescriptor::scalar("svr_pool_server_max_concurrent_request", AttributeType::Int))
        .field(FieldDescriptor::scalar("svr_pool_server_max_request", AttributeType::Int))
        .field(FieldDescriptor::scalar("svr_pool_ttl", AttributeType::Int))
        .field(
            FieldDescriptor::scalar("vip", AttributeType::String)
                .with_transform(transform::single_ref())
                .with_description("Virtual IP name."),
        )
        .field(
            FieldDescriptor::scalar("vip6", AttributeType::String)
                .with_transform(transform::single_ref()),
        )
        .key_field("name")
        .build()?;

    Ok(FmgSchemaConfig {
        resource_type: "ztna_web_proxy",
        api_type_name: "ZtnaWebProxy",
        scope: ScopeSpec::device_vdom(),
        descriptor,
    })
}
