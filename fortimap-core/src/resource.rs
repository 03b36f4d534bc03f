//! Resource - Local values and per-operation resource instance data

use std::collections::HashMap;

/// Local attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

/// Local state of one object: local field name -> value
pub type Attributes = HashMap<String, Value>;

impl Value {
    /// Returns true for the zero value of each variant ("", 0, false, empty list/map)
    pub fn is_zero(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::Bool(b) => !b,
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Render a scalar as an identity string (e.g., `7` or `"proxy1"`)
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Attributes> for Value {
    fn from(map: Attributes) -> Self {
        Value::Map(map)
    }
}

/// One resource instance for the duration of a single operation
///
/// `config` is what the caller declared, `state` is what the last Read
/// decoded from the remote system. Never cached across operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceData {
    /// Resource type (e.g., "system_sdwan_service")
    pub resource_type: String,
    /// External identity; `None` means the resource does not exist
    pub id: Option<String>,
    pub config: Attributes,
    pub state: Attributes,
}

impl ResourceData {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn with_config_map(mut self, attributes: Attributes) -> Self {
        self.config.extend(attributes);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_state(mut self, attributes: Attributes) -> Self {
        self.state = attributes;
        self
    }

    /// Returns true if this instance currently has an identity
    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// Look up an attribute, preferring declared configuration over state
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key).or_else(|| self.state.get(key))
    }

    /// Drop identity and state (the remote object is gone)
    pub fn clear(&mut self) {
        self.id = None;
        self.state.clear();
    }
}
