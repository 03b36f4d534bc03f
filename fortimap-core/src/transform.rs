//! Transform - Custom bidirectional conversions for individual fields
//!
//! Most fields pass through unchanged. A field whose local representation
//! differs from the API payload (a list sent as one string, a flag sent as
//! an integer, ...) attaches one of these.

use serde_json::{Value as JsonValue, json};

use crate::resource::Value;

/// Bidirectional conversion between a local value and its wire form
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub name: &'static str,
    /// Local -> wire
    pub encode: fn(&Value) -> Result<JsonValue, String>,
    /// Wire -> local; `None` means "no value"
    pub decode: fn(&JsonValue) -> Option<Value>,
    /// Wire form sent when the caller clears the field
    pub zero: fn() -> JsonValue,
    /// Decoding an encoded value may not reproduce the original exactly
    pub lossy: bool,
}

/// Integer carried as a JSON number or a numeric string
pub fn integer() -> Transform {
    Transform {
        name: "integer",
        encode: |value| match value {
            Value::Int(i) => Ok(json!(i)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| json!(i))
                .map_err(|_| format!("'{}' is not an integer", s)),
            other => Err(format!("expected integer, got {}", other.type_name())),
        },
        decode: |wire| match wire {
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Value::Int),
            JsonValue::String(s) => s.trim().parse::<i64>().ok().map(Value::Int),
            _ => None,
        },
        zero: || json!(0),
        lossy: false,
    }
}

/// Local comma-separated string <-> wire list of strings
pub fn comma_list() -> Transform {
    Transform {
        name: "comma_list",
        encode: |value| match value {
            Value::String(s) => Ok(JsonValue::Array(
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| json!(part))
                    .collect(),
            )),
            other => Err(format!("expected string, got {}", other.type_name())),
        },
        decode: |wire| join_strings(wire, ","),
        zero: || json!([]),
        lossy: true,
    }
}

/// Local space-separated string <-> wire list (e.g., "10.0.0.1 255.255.255.0")
///
/// A '/' also separates on encode, so "10.0.0.0/255.255.0.0" goes out as a pair.
pub fn space_list() -> Transform {
    Transform {
        name: "space_list",
        encode: |value| match value {
            Value::String(s) => Ok(JsonValue::Array(
                s.split(|c: char| c.is_whitespace() || c == '/')
                    .filter(|part| !part.is_empty())
                    .map(|part| json!(part))
                    .collect(),
            )),
            other => Err(format!("expected string, got {}", other.type_name())),
        },
        decode: |wire| join_strings(wire, " "),
        zero: || json!([]),
        lossy: true,
    }
}

/// Local single name <-> wire one-element reference list
pub fn single_ref() -> Transform {
    Transform {
        name: "single_ref",
        encode: |value| match value {
            Value::String(s) if s.is_empty() => Ok(JsonValue::Array(vec![])),
            Value::String(s) => Ok(json!([s])),
            other => Err(format!("expected string, got {}", other.type_name())),
        },
        decode: |wire| match wire {
            JsonValue::Array(items) => items.first().and_then(scalar_string).map(Value::String),
            other => scalar_string(other).map(Value::String),
        },
        zero: || json!([]),
        lossy: true,
    }
}

/// Local "enable"/"disable" <-> wire 1/0 (either form accepted on decode)
pub fn enable_flag() -> Transform {
    Transform {
        name: "enable_flag",
        encode: |value| match value.as_str() {
            Some("enable") => Ok(json!(1)),
            Some("disable") => Ok(json!(0)),
            _ => Err(format!("expected enable or disable, got {:?}", value)),
        },
        decode: |wire| {
            let enabled = match wire {
                JsonValue::Number(n) => n.as_i64()? != 0,
                JsonValue::Bool(b) => *b,
                JsonValue::String(s) => match s.as_str() {
                    "enable" | "1" => true,
                    "disable" | "0" => false,
                    _ => return None,
                },
                _ => return None,
            };
            Some(Value::from(if enabled { "enable" } else { "disable" }))
        },
        zero: || json!(0),
        lossy: false,
    }
}

fn scalar_string(wire: &JsonValue) -> Option<String> {
    match wire {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn join_strings(wire: &JsonValue, separator: &str) -> Option<Value> {
    match wire {
        JsonValue::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_string).collect();
            Some(Value::String(parts.join(separator)))
        }
        JsonValue::Null => None,
        other => scalar_string(other).map(Value::String),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_accepts_numeric_strings() {
        let t = integer();
        assert_eq!((t.decode)(&json!("7")), Some(Value::Int(7)));
        assert_eq!((t.decode)(&json!(7.0)), Some(Value::Int(7)));
        assert_eq!((t.decode)(&json!("seven")), None);
        assert_eq!((t.encode)(&Value::from("42")).unwrap(), json!(42));
        assert!((t.encode)(&Value::from("x")).is_err());
    }

    #[test]
    fn comma_list_splits_and_joins() {
        let t = comma_list();
        assert_eq!((t.encode)(&Value::from("a, b,,c")).unwrap(), json!(["a", "b", "c"]));
        assert_eq!((t.decode)(&json!(["a", "b"])), Some(Value::from("a,b")));
        assert_eq!((t.decode)(&json!("a")), Some(Value::from("a")));
        assert_eq!((t.decode)(&JsonValue::Null), None);
    }

    #[test]
    fn space_list_handles_ip_mask() {
        let t = space_list();
        assert_eq!(
            (t.encode)(&Value::from("10.0.0.1 255.255.255.0")).unwrap(),
            json!(["10.0.0.1", "255.255.255.0"])
        );
        assert_eq!(
            (t.decode)(&json!(["10.0.0.1", "255.255.255.0"])),
            Some(Value::from("10.0.0.1 255.255.255.0"))
        );
        assert_eq!(
            (t.encode)(&Value::from("10.10.0.0/255.255.0.0")).unwrap(),
            json!(["10.10.0.0", "255.255.0.0"])
        );
    }

    #[test]
    fn single_ref_wraps_and_unwraps() {
        let t = single_ref();
        assert_eq!((t.encode)(&Value::from("vip1")).unwrap(), json!(["vip1"]));
        assert_eq!((t.encode)(&Value::from("")).unwrap(), json!([]));
        assert_eq!((t.decode)(&json!(["vip1", "vip2"])), Some(Value::from("vip1")));
        assert_eq!((t.decode)(&json!("vip1")), Some(Value::from("vip1")));
        assert_eq!((t.decode)(&json!([])), None);
    }

    #[test]
    fn enable_flag_both_forms() {
        let t = enable_flag();
        assert_eq!((t.encode)(&Value::from("enable")).unwrap(), json!(1));
        assert_eq!((t.encode)(&Value::from("disable")).unwrap(), json!(0));
        assert!((t.encode)(&Value::from("on")).is_err());
        assert_eq!((t.decode)(&json!(1)), Some(Value::from("enable")));
        assert_eq!((t.decode)(&json!("disable")), Some(Value::from("disable")));
        assert_eq!((t.decode)(&json!(false)), Some(Value::from("disable")));
        assert_eq!((t.decode)(&json!("maybe")), None);
    }

    #[test]
    fn cleared_value_uses_wire_zero() {
        assert_eq!((integer().zero)(), json!(0));
        assert_eq!((enable_flag().zero)(), json!(0));
        assert_eq!((comma_list().zero)(), json!([]));
        assert_eq!((space_list().zero)(), json!([]));
        assert_eq!((single_ref().zero)(), json!([]));
    }
}
