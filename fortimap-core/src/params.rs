//! Params - Addressing coordinates threaded through every client call
//!
//! A resource type declares which local attributes locate it on the managed
//! device (`device_name` -> `device`, `device_vdom` -> `vdom`, ...). Values
//! come from the declared configuration, falling back to the import options
//! supplied when an existing object is adopted.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{ProviderError, ProviderResult};
use crate::resource::ResourceData;

/// One local attribute bound to one request parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBinding {
    /// Local attribute name (e.g., "device_name")
    pub attribute: &'static str,
    /// Request parameter key (e.g., "device")
    pub param: &'static str,
}

/// Addressing parameters required by a resource type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSpec {
    bindings: Vec<ParamBinding>,
}

impl ScopeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, attribute: &'static str, param: &'static str) -> Self {
        self.bindings.push(ParamBinding { attribute, param });
        self
    }

    /// Device and vdom scoped object (most device objects)
    pub fn device_vdom() -> Self {
        Self::new()
            .bind("device_name", "device")
            .bind("device_vdom", "vdom")
    }

    /// Global device object
    pub fn device() -> Self {
        Self::new().bind("device_name", "device")
    }

    /// Per-interface sub-object (no vdom)
    pub fn device_interface() -> Self {
        Self::new()
            .bind("device_name", "device")
            .bind("interface", "interface")
    }

    /// ADOM-level object
    pub fn adom() -> Self {
        Self::new().bind("adom", "adom")
    }

    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// Returns true if `attribute` is an addressing attribute of this scope
    pub fn is_scope_attribute(&self, attribute: &str) -> bool {
        self.bindings.iter().any(|b| b.attribute == attribute)
    }

    /// Resolve every binding from local config, then import options
    pub fn resolve(&self, data: &ResourceData, import: &ImportOptions) -> ProviderResult<ParamContext> {
        let mut params = ParamContext::new();
        for binding in &self.bindings {
            let value = data
                .get(binding.attribute)
                .and_then(|v| v.to_key_string())
                .or_else(|| import.get(binding.attribute).map(str::to_string))
                .ok_or_else(|| ProviderError::missing_parameter(binding.attribute))?;
            params.insert(binding.param, value);
        }
        Ok(params)
    }
}

/// Request parameters of one call (`device`, `vdom`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamContext {
    entries: BTreeMap<String, String>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn device(&self) -> Option<&str> {
        self.get("device")
    }

    pub fn vdom(&self) -> Option<&str> {
        self.get("vdom")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ParamContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        f.write_str(&rendered.join(","))
    }
}

/// Workspace-mode request parameters (`adom` scoping)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceParams {
    pub adom: Option<String>,
}

impl WorkspaceParams {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn adom(adom: impl Into<String>) -> Self {
        Self {
            adom: Some(adom.into()),
        }
    }
}

/// Key/value context supplied when importing an existing object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    values: HashMap<String, String>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` entries (e.g., `["device_name=FGT1", "device_vdom=root"]`)
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> ProviderResult<Self> {
        let mut options = Self::new();
        for entry in entries {
            let entry = entry.as_ref();
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                ProviderError::configuration(format!(
                    "Invalid import option '{}': expected key=value",
                    entry
                ))
            })?;
            options.values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(options)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
