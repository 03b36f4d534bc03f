//! Encode - Expand local state into API payloads
//!
//! Walks local attributes against an [`ObjectDescriptor`] and produces the
//! wire object. Only fields the [`Presence`] oracle reports are emitted.

use serde_json::{Map, Value as JsonValue, json};

use crate::presence::Presence;
use crate::resource::{Attributes, Value};
use crate::schema::{AttributeType, FieldDescriptor, FieldKind, ObjectDescriptor};

/// Placeholder written in place of sensitive values
pub const REDACTED: &str = "********";

/// Wire object (ordered by descriptor field order)
pub type WireObject = Map<String, JsonValue>;

/// A local value could not be converted; `field` is the element-scoped path
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("field '{field}': {message}")]
pub struct EncodeError {
    pub field: String,
    pub message: String,
}

impl EncodeError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Encode local attributes into a wire object
pub fn encode(
    descriptor: &ObjectDescriptor,
    local: &Attributes,
    presence: &dyn Presence,
) -> Result<WireObject, EncodeError> {
    encode_object(descriptor, local, "", presence)
}

fn encode_object(
    descriptor: &ObjectDescriptor,
    local: &Attributes,
    prefix: &str,
    presence: &dyn Presence,
) -> Result<WireObject, EncodeError> {
    let mut object = Map::new();

    for field in descriptor.fields() {
        let path = format!("{}{}", prefix, field.name);
        let value = local.get(&field.name).or(field.default.as_ref());
        if !presence.is_present(&path, field, value) {
            continue;
        }
        if let Some(wire) = encode_field(field, value, &path, presence)? {
            object.insert(field.wire_name.clone(), wire);
        }
    }

    Ok(object)
}

/// Encode one present field; `Ok(None)` means the key is omitted
pub fn encode_field(
    field: &FieldDescriptor,
    value: Option<&Value>,
    path: &str,
    presence: &dyn Presence,
) -> Result<Option<JsonValue>, EncodeError> {
    match field.kind {
        FieldKind::Scalar => match value {
            Some(v) => encode_scalar(field, v, path).map(Some),
            None => Ok(Some(match &field.transform {
                Some(transform) => (transform.zero)(),
                None => zero_value(&field.attr_type),
            })),
        },
        FieldKind::ScalarSet => {
            let items = match value {
                None => &[][..],
                Some(Value::List(items)) => items.as_slice(),
                Some(other) => std::slice::from_ref(other),
            };
            let encoded = items
                .iter()
                .map(|item| encode_scalar(field, item, path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(JsonValue::Array(encoded)))
        }
        FieldKind::ObjectList => {
            let Some(child) = field.child() else {
                return Ok(None);
            };
            let items = match value {
                None => return Ok(None),
                Some(Value::List(items)) => items.as_slice(),
                Some(other) => std::slice::from_ref(other),
            };

            let mut encoded = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let element_path = format!("{}.{}", path, index);
                let Value::Map(attributes) = item else {
                    return Err(EncodeError::new(&element_path, "expected an object"));
                };
                let object = encode_object(child, attributes, &format!("{}.", element_path), presence)?;
                if !object.is_empty() {
                    encoded.push(JsonValue::Object(object));
                }
            }

            if encoded.is_empty() {
                Ok(None)
            } else {
                Ok(Some(JsonValue::Array(encoded)))
            }
        }
        FieldKind::SingleObject => {
            let Some(child) = field.child() else {
                return Ok(None);
            };
            let attributes = match value {
                Some(Value::List(items)) => match items.first() {
                    Some(Value::Map(attributes)) => attributes,
                    Some(_) => {
                        return Err(EncodeError::new(&format!("{}.0", path), "expected an object"));
                    }
                    None => return Ok(None),
                },
                Some(Value::Map(attributes)) => attributes,
                Some(_) => return Err(EncodeError::new(path, "expected an object")),
                None => return Ok(None),
            };

            let object = encode_object(child, attributes, &format!("{}.0.", path), presence)?;
            if object.is_empty() {
                Ok(None)
            } else {
                Ok(Some(JsonValue::Object(object)))
            }
        }
    }
}

fn encode_scalar(field: &FieldDescriptor, value: &Value, path: &str) -> Result<JsonValue, EncodeError> {
    match &field.transform {
        Some(transform) => (transform.encode)(value).map_err(|message| EncodeError::new(path, message)),
        None => Ok(value_to_json(value)),
    }
}

/// Convert a local value to JSON without any field-specific transform
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => json!(s),
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Value sent for a field that is present but has no local value
fn zero_value(attr_type: &AttributeType) -> JsonValue {
    match attr_type.base() {
        AttributeType::Int => json!(0),
        AttributeType::Bool => json!(false),
        _ => json!(""),
    }
}

/// Copy of a wire object with every sensitive field masked, for logging
pub fn redact(descriptor: &ObjectDescriptor, wire: &JsonValue) -> JsonValue {
    let JsonValue::Object(object) = wire else {
        return wire.clone();
    };

    let redacted = object
        .iter()
        .map(|(key, value)| {
            let masked = match descriptor.field_by_wire_name(key) {
                Some(field) if field.sensitive => json!(REDACTED),
                Some(field) => match (field.child(), value) {
                    (Some(child), JsonValue::Array(items)) => {
                        JsonValue::Array(items.iter().map(|item| redact(child, item)).collect())
                    }
                    (Some(child), item) => redact(child, item),
                    (None, other) => other.clone(),
                },
                None => value.clone(),
            };
            (key.clone(), masked)
        })
        .collect();

    JsonValue::Object(redacted)
}
