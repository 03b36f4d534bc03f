//! Schema - Field and object descriptors for resources
//!
//! Each resource type declares its fields once: the local name used in
//! configuration and state, the name used in the API payload, the shape of
//! the value, and an optional custom transform. The decoder and encoder walk
//! these descriptors instead of hand-written per-field conversions.

use std::collections::HashSet;
use std::fmt;

use heck::ToKebabCase;

use crate::resource::{Attributes, Value};
use crate::transform::Transform;

/// Attribute type of a scalar (or of each element of a scalar set)
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
}

impl AttributeType {
    /// Enum type from a list of allowed values
    pub fn enumeration(variants: &[&str]) -> Self {
        AttributeType::Enum(variants.iter().map(|v| v.to_string()).collect())
    }

    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { validate, .. }, v) => {
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    /// The primitive type underneath enums and custom types
    pub fn base(&self) -> &AttributeType {
        match self {
            AttributeType::Enum(_) => &AttributeType::String,
            AttributeType::Custom { base, .. } => base.base(),
            other => other,
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error found while validating local values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Attribute '{name}': {inner}")]
    Field { name: String, inner: Box<TypeError> },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },
}

/// Descriptor construction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate {which} name '{name}' in {object}")]
    DuplicateField {
        object: String,
        /// "local" or "wire"
        which: &'static str,
        name: String,
    },

    #[error("Field '{field}' in {object} is {kind} but {problem}")]
    InvalidKind {
        object: String,
        field: String,
        kind: FieldKind,
        problem: &'static str,
    },

    #[error("Key field '{field}' is not declared in {object}")]
    UnknownKeyField { object: String, field: String },
}

/// Shape of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single scalar value
    Scalar,
    /// Unordered collection of scalars
    ScalarSet,
    /// Ordered sequence of nested objects
    ObjectList,
    /// At most one nested object
    SingleObject,
}

impl FieldKind {
    /// Returns true if this kind owns a child descriptor
    pub fn is_object(self) -> bool {
        matches!(self, FieldKind::ObjectList | FieldKind::SingleObject)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Scalar => "Scalar",
            FieldKind::ScalarSet => "ScalarSet",
            FieldKind::ObjectList => "ObjectList",
            FieldKind::SingleObject => "SingleObject",
        };
        f.write_str(name)
    }
}

/// Mapping contract of one field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Local name (e.g., "ip6_prefix_list")
    pub name: String,
    /// API payload name (e.g., "ip6-prefix-list")
    pub wire_name: String,
    pub kind: FieldKind,
    /// Scalar type, or element type for scalar sets
    pub attr_type: AttributeType,
    /// Nested descriptor for object kinds
    pub child: Option<Box<ObjectDescriptor>>,
    pub required: bool,
    /// Server may supply a value the caller did not set
    pub computed: bool,
    /// Never log or display in clear form
    pub sensitive: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub transform: Option<Transform>,
}

impl FieldDescriptor {
    /// Field with an explicit kind; the wire name defaults to the kebab-case local name
    pub fn new(name: impl Into<String>, kind: FieldKind, attr_type: AttributeType) -> Self {
        let name = name.into();
        Self {
            wire_name: name.to_kebab_case(),
            name,
            kind,
            attr_type,
            child: None,
            required: false,
            computed: false,
            sensitive: false,
            default: None,
            description: None,
            transform: None,
        }
    }

    pub fn scalar(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self::new(name, FieldKind::Scalar, attr_type)
    }

    pub fn set(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self::new(name, FieldKind::ScalarSet, attr_type)
    }

    pub fn list(name: impl Into<String>, child: ObjectDescriptor) -> Self {
        Self::new(name, FieldKind::ObjectList, AttributeType::String).with_child(child)
    }

    pub fn single(name: impl Into<String>, child: ObjectDescriptor) -> Self {
        Self::new(name, FieldKind::SingleObject, AttributeType::String).with_child(child)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_wire_name(mut self, name: impl Into<String>) -> Self {
        self.wire_name = name.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_child(mut self, child: ObjectDescriptor) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    pub fn child(&self) -> Option<&ObjectDescriptor> {
        self.child.as_deref()
    }

    /// Validate a local value against this field, reporting nested paths
    fn collect_errors(&self, value: &Value, path: &str, errors: &mut Vec<TypeError>) {
        let at = |inner: TypeError| TypeError::Field {
            name: path.to_string(),
            inner: Box::new(inner),
        };

        match self.kind {
            FieldKind::Scalar => {
                if let Err(e) = self.attr_type.validate(value) {
                    errors.push(at(e));
                }
            }
            FieldKind::ScalarSet => match value {
                Value::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        if let Err(e) = self.attr_type.validate(item) {
                            errors.push(at(TypeError::ListItemError {
                                index,
                                inner: Box::new(e),
                            }));
                        }
                    }
                }
                other => errors.push(at(TypeError::TypeMismatch {
                    expected: format!("Set<{}>", self.attr_type),
                    got: other.type_name(),
                })),
            },
            FieldKind::ObjectList | FieldKind::SingleObject => {
                let Some(child) = self.child() else {
                    return;
                };
                let Value::List(items) = value else {
                    errors.push(at(TypeError::TypeMismatch {
                        expected: "List<Object>".to_string(),
                        got: value.type_name(),
                    }));
                    return;
                };
                if self.kind == FieldKind::SingleObject && items.len() > 1 {
                    errors.push(at(TypeError::ValidationFailed {
                        message: format!("at most one block allowed, got {}", items.len()),
                    }));
                }
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::Map(attributes) => child.collect_errors(
                            attributes,
                            &format!("{}.{}.", path, index),
                            errors,
                        ),
                        other => errors.push(at(TypeError::ListItemError {
                            index,
                            inner: Box::new(TypeError::TypeMismatch {
                                expected: "Object".to_string(),
                                got: other.type_name(),
                            }),
                        })),
                    }
                }
            }
        }
    }
}

/// Mapping contract of one resource type (or nested block)
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    key_field: Option<String>,
    description: Option<String>,
}

impl ObjectDescriptor {
    pub fn builder(name: impl Into<String>) -> ObjectDescriptorBuilder {
        ObjectDescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
            key_field: None,
            description: None,
        }
    }

    /// Resource type name (e.g., "SystemSdwanService")
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field by local name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field by API payload name
    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }

    /// The field carrying the external identity, if any
    pub fn key_field(&self) -> Option<&FieldDescriptor> {
        self.key_field.as_deref().and_then(|name| self.field(name))
    }

    /// Validate local attributes, collecting every error
    pub fn validate(&self, attributes: &Attributes) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();
        self.collect_errors(attributes, "", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn collect_errors(&self, attributes: &Attributes, prefix: &str, errors: &mut Vec<TypeError>) {
        for field in &self.fields {
            let path = format!("{}{}", prefix, field.name);
            match attributes.get(&field.name) {
                Some(value) => field.collect_errors(value, &path, errors),
                None if field.required && field.default.is_none() => {
                    errors.push(TypeError::MissingRequired { name: path });
                }
                None => {}
            }
            // Unknown attributes are allowed (scope parameters live alongside fields)
        }
    }
}

/// Builder that validates descriptor invariants on `build`
#[derive(Debug)]
pub struct ObjectDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    key_field: Option<String>,
    description: Option<String>,
}

impl ObjectDescriptorBuilder {
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn key_field(mut self, name: impl Into<String>) -> Self {
        self.key_field = Some(name.into());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn build(self) -> Result<ObjectDescriptor, SchemaError> {
        let mut local_names = HashSet::new();
        let mut wire_names = HashSet::new();

        for field in &self.fields {
            if !local_names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    object: self.name.clone(),
                    which: "local",
                    name: field.name.clone(),
                });
            }
            if !wire_names.insert(field.wire_name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    object: self.name.clone(),
                    which: "wire",
                    name: field.wire_name.clone(),
                });
            }

            let problem = match (field.kind.is_object(), field.child.is_some()) {
                (true, false) => Some("has no child descriptor"),
                (false, true) => Some("carries a child descriptor"),
                _ => None,
            };
            if let Some(problem) = problem {
                return Err(SchemaError::InvalidKind {
                    object: self.name.clone(),
                    field: field.name.clone(),
                    kind: field.kind,
                    problem,
                });
            }
        }

        if let Some(key) = &self.key_field
            && !local_names.contains(key.as_str())
        {
            return Err(SchemaError::UnknownKeyField {
                object: self.name.clone(),
                field: key.clone(),
            });
        }

        Ok(ObjectDescriptor {
            name: self.name,
            fields: self.fields,
            key_field: self.key_field,
            description: self.description,
        })
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// Positive integer type
    pub fn positive_int() -> AttributeType {
        AttributeType::Custom {
            name: "PositiveInt".to_string(),
            base: Box::new(AttributeType::Int),
            validate: |value| {
                if let Value::Int(n) = value {
                    if *n > 0 {
                        Ok(())
                    } else {
                        Err("Value must be positive".to_string())
                    }
                } else {
                    Err("Expected integer".to_string())
                }
            },
        }
    }

    /// Port number type (0-65535)
    pub fn port() -> AttributeType {
        AttributeType::Custom {
            name: "Port".to_string(),
            base: Box::new(AttributeType::Int),
            validate: |value| match value {
                Value::Int(n) if (0..=65535).contains(n) => Ok(()),
                Value::Int(n) => Err(format!("Invalid port {}: must be 0-65535", n)),
                _ => Err("Expected integer".to_string()),
            },
        }
    }

    /// IPv6 address with prefix length (e.g., "2001:db8::1/64")
    pub fn ipv6_prefix() -> AttributeType {
        AttributeType::Custom {
            name: "Ipv6Prefix".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    validate_ipv6_prefix(s)
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }

    /// "enable" / "disable" switch
    pub fn enable_disable() -> AttributeType {
        AttributeType::enumeration(&["enable", "disable"])
    }
}

/// Validate IPv6 prefix format (e.g., "2001:db8::/64")
pub fn validate_ipv6_prefix(prefix: &str) -> Result<(), String> {
    let Some((addr, len)) = prefix.split_once('/') else {
        return Err(format!(
            "Invalid IPv6 prefix '{}': expected address/length",
            prefix
        ));
    };

    if addr.parse::<std::net::Ipv6Addr>().is_err() {
        return Err(format!("Invalid IPv6 address '{}'", addr));
    }

    match len.parse::<u8>() {
        Ok(l) if l <= 128 => Ok(()),
        Ok(l) => Err(format!("Invalid prefix length '{}': must be 0-128", l)),
        Err(_) => Err(format!("Invalid prefix length '{}': must be a number", len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sla() -> ObjectDescriptor {
        ObjectDescriptor::builder("SystemSdwanServiceSla")
            .field(FieldDescriptor::scalar("health_check", AttributeType::String).required())
            .field(FieldDescriptor::scalar("id", AttributeType::Int))
            .key_field("id")
            .build()
            .unwrap()
    }

    #[test]
    fn wire_name_defaults_to_kebab_case() {
        let f = FieldDescriptor::scalar("ip6_prefix_list", AttributeType::String);
        assert_eq!(f.wire_name, "ip6-prefix-list");
        let f = FieldDescriptor::scalar("fosid", AttributeType::Int).with_wire_name("id");
        assert_eq!(f.wire_name, "id");
    }

    #[test]
    fn duplicate_local_name_rejected() {
        let err = ObjectDescriptor::builder("Dup")
            .field(FieldDescriptor::scalar("name", AttributeType::String))
            .field(FieldDescriptor::scalar("name", AttributeType::String).with_wire_name("other"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { which: "local", .. }));
    }

    #[test]
    fn duplicate_wire_name_rejected() {
        let err = ObjectDescriptor::builder("Dup")
            .field(FieldDescriptor::scalar("fosid", AttributeType::Int).with_wire_name("id"))
            .field(FieldDescriptor::scalar("id", AttributeType::Int))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                object: "Dup".to_string(),
                which: "wire",
                name: "id".to_string(),
            }
        );
    }

    #[test]
    fn object_kind_without_child_rejected() {
        let err = ObjectDescriptor::builder("Broken")
            .field(FieldDescriptor::new("sla", FieldKind::ObjectList, AttributeType::String))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidKind {
                kind: FieldKind::ObjectList,
                ..
            }
        ));

        let err = ObjectDescriptor::builder("Broken")
            .field(FieldDescriptor::new("radio", FieldKind::SingleObject, AttributeType::String))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("has no child descriptor"));
    }

    #[test]
    fn scalar_with_child_rejected() {
        let err = ObjectDescriptor::builder("Broken")
            .field(FieldDescriptor::scalar("name", AttributeType::String).with_child(sla()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("carries a child descriptor"));
    }

    #[test]
    fn unknown_key_field_rejected() {
        let err = ObjectDescriptor::builder("NoKey")
            .field(FieldDescriptor::scalar("name", AttributeType::String))
            .key_field("fosid")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownKeyField { .. }));
    }

    #[test]
    fn validate_enum_type() {
        let t = AttributeType::enumeration(&["enable", "disable"]);
        assert!(t.validate(&Value::from("enable")).is_ok());
        assert!(t.validate(&Value::from("on")).is_err());
    }

    #[test]
    fn validate_reports_nested_paths() {
        let desc = ObjectDescriptor::builder("SystemSdwanService")
            .field(FieldDescriptor::scalar("fosid", AttributeType::Int).with_wire_name("id").required())
            .field(FieldDescriptor::set("dst", AttributeType::String))
            .field(FieldDescriptor::list("sla", sla()))
            .key_field("fosid")
            .build()
            .unwrap();

        let mut attrs = Attributes::new();
        attrs.insert("dst".to_string(), Value::List(vec![Value::from("all"), Value::Int(3)]));
        attrs.insert(
            "sla".to_string(),
            Value::List(vec![Value::Map(
                [("id".to_string(), Value::Int(1))].into_iter().collect(),
            )]),
        );

        let errors = desc.validate(&attrs).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&TypeError::MissingRequired {
            name: "fosid".to_string()
        }));
        assert!(errors.contains(&TypeError::MissingRequired {
            name: "sla.0.health_check".to_string()
        }));
        assert!(errors.iter().any(|e| matches!(
            e,
            TypeError::Field { name, inner } if name == "dst"
                && matches!(**inner, TypeError::ListItemError { index: 1, .. })
        )));
    }

    #[test]
    fn validate_single_object_arity() {
        let desc = ObjectDescriptor::builder("Wtp")
            .field(FieldDescriptor::single("radio_1", sla()))
            .build()
            .unwrap();
        let block = |hc: &str| {
            Value::Map([("health_check".to_string(), Value::from(hc))].into_iter().collect())
        };
        let mut attrs = Attributes::new();
        attrs.insert("radio_1".to_string(), Value::List(vec![block("a"), block("b")]));
        assert!(desc.validate(&attrs).is_err());

        attrs.insert("radio_1".to_string(), Value::List(vec![block("a")]));
        assert!(desc.validate(&attrs).is_ok());
    }

    #[test]
    fn validate_ipv6_prefix_type() {
        let t = types::ipv6_prefix();
        assert!(t.validate(&Value::from("2001:db8::/64")).is_ok());
        assert!(t.validate(&Value::from("::/0")).is_ok());
        assert!(t.validate(&Value::from("2001:db8::")).is_err());
        assert!(t.validate(&Value::from("2001:db8::/129")).is_err());
        assert!(t.validate(&Value::from("10.0.0.0/8")).is_err());
        assert!(t.validate(&Value::Int(1)).is_err());
    }

    #[test]
    fn validate_port_type() {
        let t = types::port();
        assert!(t.validate(&Value::Int(443)).is_ok());
        assert!(t.validate(&Value::Int(70000)).is_err());
    }

    #[test]
    fn base_type_unwraps_custom() {
        assert!(matches!(types::port().base(), AttributeType::Int));
        assert!(matches!(types::enable_disable().base(), AttributeType::String));
    }
}
