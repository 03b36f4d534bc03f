//! Decode - Flatten API payloads into local state
//!
//! Walks a wire value tree against an [`ObjectDescriptor`] and produces local
//! attributes. Pure: no I/O, no mutation of caller state. Type coercion of the
//! loosely typed payload happens here and nowhere else.

use std::cmp::Ordering;

use serde_json::Value as JsonValue;

use crate::resource::{Attributes, Value};
use crate::schema::{AttributeType, FieldDescriptor, FieldKind, ObjectDescriptor};

/// Decoder switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Order nested object lists by their key field instead of wire order
    pub sort_subtables: bool,
}

/// Decode a wire object with default options
///
/// Returns `None` for a null (absent) or non-object payload.
pub fn decode(descriptor: &ObjectDescriptor, wire: &JsonValue) -> Option<Attributes> {
    decode_with(descriptor, wire, DecodeOptions::default())
}

/// Decode a wire object
pub fn decode_with(
    descriptor: &ObjectDescriptor,
    wire: &JsonValue,
    options: DecodeOptions,
) -> Option<Attributes> {
    let object = match wire {
        JsonValue::Object(object) => object,
        JsonValue::Null => return None,
        other => {
            log::debug!(
                "{}: expected object payload, got {}",
                descriptor.name(),
                json_type_name(other)
            );
            return None;
        }
    };

    let mut attributes = Attributes::new();
    for field in descriptor.fields() {
        if let Some(value) = object
            .get(&field.wire_name)
            .and_then(|v| decode_field(field, v, options))
        {
            attributes.insert(field.name.clone(), value);
        }
    }
    Some(attributes)
}

/// Decode one field's wire value; `None` means "not present"
pub fn decode_field(
    field: &FieldDescriptor,
    wire: &JsonValue,
    options: DecodeOptions,
) -> Option<Value> {
    if wire.is_null() {
        return None;
    }

    match field.kind {
        FieldKind::Scalar => decode_scalar(field, wire),
        FieldKind::ScalarSet => {
            // Set order is not significant; wire order is kept as-is
            let items: Vec<Value> = match wire {
                JsonValue::Array(items) => items.iter().filter_map(|v| decode_scalar(field, v)).collect(),
                single => decode_scalar(field, single).into_iter().collect(),
            };
            Some(Value::List(items))
        }
        FieldKind::ObjectList => {
            let child = field.child()?;
            let items = match wire {
                JsonValue::Array(items) => items.as_slice(),
                JsonValue::Object(_) => std::slice::from_ref(wire),
                _ => return None,
            };
            // An empty list is indistinguishable from an absent one
            if items.first().is_none_or(JsonValue::is_null) {
                return None;
            }

            let mut decoded: Vec<Attributes> = items
                .iter()
                .filter_map(|item| decode_with(child, item, options))
                .filter(|attrs| !attrs.is_empty())
                .collect();
            if decoded.is_empty() {
                return None;
            }

            if options.sort_subtables
                && let Some(key) = child.key_field()
            {
                decoded.sort_by(|a, b| compare_keys(a.get(&key.name), b.get(&key.name)));
            }

            Some(Value::List(decoded.into_iter().map(Value::Map).collect()))
        }
        FieldKind::SingleObject => {
            let child = field.child()?;
            let object = match wire {
                JsonValue::Array(items) => items.first()?,
                other => other,
            };
            let attributes = decode_with(child, object, options)?;
            Some(Value::List(vec![Value::Map(attributes)]))
        }
    }
}

fn decode_scalar(field: &FieldDescriptor, wire: &JsonValue) -> Option<Value> {
    match &field.transform {
        Some(transform) => (transform.decode)(wire),
        None => json_to_value(field.attr_type.base(), wire),
    }
}

/// Convert a JSON value to a local value, coercing to the declared type
fn json_to_value(attr_type: &AttributeType, value: &JsonValue) -> Option<Value> {
    match (attr_type, value) {
        (_, JsonValue::Null) => None,
        (AttributeType::Int, JsonValue::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Some(Value::Int(i)),
            Err(_) => Some(Value::String(s.clone())),
        },
        (AttributeType::Bool, JsonValue::Number(n)) => Some(Value::Bool(n.as_i64() != Some(0))),
        (AttributeType::String, JsonValue::Number(n)) => Some(Value::String(n.to_string())),
        (_, JsonValue::String(s)) => Some(Value::String(s.clone())),
        (_, JsonValue::Bool(b)) => Some(Value::Bool(*b)),
        (_, JsonValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Int(i))
            } else {
                n.as_f64().map(|f| Value::Int(f as i64))
            }
        }
        (_, JsonValue::Array(arr)) => Some(Value::List(
            arr.iter().filter_map(|v| json_to_value(attr_type, v)).collect(),
        )),
        (_, JsonValue::Object(map)) => Some(Value::Map(
            map.iter()
                .filter_map(|(k, v)| json_to_value(&AttributeType::String, v).map(|v| (k.clone(), v)))
                .collect(),
        )),
    }
}

/// Ordering for subtable keys: integers numerically and before strings
fn compare_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Int(x)), Some(Value::Int(y))) => x.cmp(y),
        (Some(Value::Int(_)), Some(_)) => Ordering::Less,
        (Some(_), Some(Value::Int(_))) => Ordering::Greater,
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
