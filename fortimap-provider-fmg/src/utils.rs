//! Value validators for FortiOS object attributes

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

use fortimap_core::resource::Value;
use fortimap_core::schema::AttributeType;

static OBJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^\s"\\]{1,79}$"#).expect("object name pattern is valid"));

static WTP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,35}$").expect("WTP ID pattern is valid"));

static IP_MASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:\.\d{1,3}){3})[ /](\d{1,3}(?:\.\d{1,3}){3})$").expect("ip/mask pattern is valid")
});

/// Validate a FortiOS object name (no whitespace or quotes, at most 79 characters)
pub fn validate_object_name(name: &str) -> Result<(), String> {
    if OBJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(format!(
            "Invalid name '{}': expected 1-79 characters without whitespace or quotes",
            name
        ))
    }
}

/// Validate a FortiAP serial / WTP ID (e.g., "FP231FTF20000001")
pub fn validate_wtp_id(id: &str) -> Result<(), String> {
    if WTP_ID.is_match(id) {
        Ok(())
    } else {
        Err(format!(
            "Invalid WTP ID '{}': expected 1-35 letters, digits, '-' or '_'",
            id
        ))
    }
}

/// Validate an IPv4 address with netmask, space or slash separated (e.g., "10.0.0.0 255.255.255.0")
pub fn validate_ip_mask(value: &str) -> Result<(), String> {
    let captures = IP_MASK
        .captures(value)
        .ok_or_else(|| format!("Invalid address '{}': expected 'ip netmask'", value))?;

    let ip = &captures[1];
    let mask = &captures[2];
    ip.parse::<Ipv4Addr>()
        .map_err(|_| format!("Invalid IPv4 address '{}'", ip))?;
    let mask_bits = u32::from(
        mask.parse::<Ipv4Addr>()
            .map_err(|_| format!("Invalid netmask '{}'", mask))?,
    );
    // Contiguous ones followed by zeros
    if mask_bits.leading_ones() + mask_bits.trailing_zeros() != 32 {
        return Err(format!("Invalid netmask '{}': not contiguous", mask));
    }
    Ok(())
}

fn string_validator(value: &Value, check: fn(&str) -> Result<(), String>) -> Result<(), String> {
    match value {
        Value::String(s) => check(s),
        _ => Err("Expected string".to_string()),
    }
}

/// FortiOS object name type
pub fn object_name() -> AttributeType {
    AttributeType::Custom {
        name: "ObjectName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| string_validator(value, validate_object_name),
    }
}

/// FortiAP WTP ID type
pub fn wtp_id() -> AttributeType {
    AttributeType::Custom {
        name: "WtpId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| string_validator(value, validate_wtp_id),
    }
}

/// IPv4 "address netmask" type
pub fn ip_mask() -> AttributeType {
    AttributeType::Custom {
        name: "IpMask".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| string_validator(value, validate_ip_mask),
    }
}

/// Integer restricted to an inclusive range, checked by `validate`
macro_rules! int_range_type {
    ($fn_name:ident, $type_name:expr, $min:expr, $max:expr) => {
        pub fn $fn_name() -> AttributeType {
            AttributeType::Custom {
                name: $type_name.to_string(),
                base: Box::new(AttributeType::Int),
                validate: |value| match value {
                    Value::Int(n) if ($min..=$max).contains(n) => Ok(()),
                    Value::Int(n) => Err(format!("Value {} out of range {}-{}", n, $min, $max)),
                    _ => Err("Expected integer".to_string()),
                },
            }
        }
    };
}

int_range_type!(percent, "Percent", 0, 100);
int_range_type!(vrid, "Vrid", 1, 255);
int_range_type!(mtu, "Mtu", 576, 9000);
int_range_type!(hop_limit, "HopLimit", 0, 255);
