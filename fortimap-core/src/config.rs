//! Provider configuration
//!
//! Settings shared by every resource of one provider instance. Loaded from a
//! JSON document or from the attribute map of a provider block.

use serde::Deserialize;

use crate::client::CallOptions;
use crate::decode::DecodeOptions;
use crate::error::{ProviderError, ProviderResult};
use crate::params::WorkspaceParams;
use crate::resource::{Attributes, Value};

/// ADOM used when none is configured
pub const DEFAULT_ADOM: &str = "root";

/// How configuration changes reach the managed devices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Changes are applied directly
    #[default]
    Disabled,
    /// Changes are staged in a locked ADOM workspace and committed explicitly
    Workspace,
}

impl std::str::FromStr for WorkspaceMode {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled" => Ok(WorkspaceMode::Disabled),
            "workspace" => Ok(WorkspaceMode::Workspace),
            other => Err(ProviderError::configuration(format!(
                "Invalid workspace_mode '{}': expected disabled or workspace",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub adom: String,
    pub workspace_mode: WorkspaceMode,
    /// Transport retries handed to the client with every call
    pub retries: u32,
    /// Order nested object lists by key when reading
    pub sort_subtables: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            adom: DEFAULT_ADOM.to_string(),
            workspace_mode: WorkspaceMode::Disabled,
            retries: 1,
            sort_subtables: false,
        }
    }
}

impl ProviderConfig {
    /// Parse a JSON configuration document; missing keys take their defaults
    pub fn from_json(content: &str) -> ProviderResult<Self> {
        serde_json::from_str(content).map_err(|e| {
            ProviderError::configuration(format!("Failed to parse provider configuration: {}", e))
        })
    }

    /// Build from the attributes of a provider block
    pub fn from_attributes(attributes: &Attributes) -> ProviderResult<Self> {
        let mut config = Self::default();

        match attributes.get("adom") {
            Some(Value::String(adom)) if !adom.is_empty() => config.adom = adom.clone(),
            Some(Value::String(_)) | None => {}
            Some(other) => return Err(invalid("adom", "a string", other)),
        }

        match attributes.get("workspace_mode") {
            Some(Value::String(mode)) => config.workspace_mode = mode.parse()?,
            None => {}
            Some(other) => return Err(invalid("workspace_mode", "a string", other)),
        }

        match attributes.get("retries") {
            Some(Value::Int(n)) => {
                config.retries = u32::try_from(*n).map_err(|_| {
                    ProviderError::configuration(format!("Invalid retries {}: must be non-negative", n))
                })?
            }
            None => {}
            Some(other) => return Err(invalid("retries", "an integer", other)),
        }

        match attributes.get("sort_subtables") {
            Some(Value::Bool(b)) => config.sort_subtables = *b,
            None => {}
            Some(other) => return Err(invalid("sort_subtables", "a bool", other)),
        }

        Ok(config)
    }

    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            retries: self.retries,
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            sort_subtables: self.sort_subtables,
        }
    }

    /// Workspace parameters for object calls; empty unless workspace mode is on
    pub fn workspace_params(&self) -> WorkspaceParams {
        match self.workspace_mode {
            WorkspaceMode::Workspace => WorkspaceParams::adom(self.adom.clone()),
            WorkspaceMode::Disabled => WorkspaceParams::none(),
        }
    }
}

fn invalid(key: &str, expected: &str, got: &Value) -> ProviderError {
    ProviderError::configuration(format!(
        "Invalid {}: expected {}, got {}",
        key,
        expected,
        got.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.adom, "root");
        assert_eq!(config.workspace_mode, WorkspaceMode::Disabled);
        assert_eq!(config.call_options(), CallOptions { retries: 1 });
        assert_eq!(config.workspace_params(), WorkspaceParams::none());
        assert!(!config.decode_options().sort_subtables);
    }

    #[test]
    fn from_json_fills_missing_keys() {
        let config = ProviderConfig::from_json(r#"{"adom": "branch", "workspace_mode": "workspace"}"#).unwrap();
        assert_eq!(config.adom, "branch");
        assert_eq!(config.retries, 1);
        assert_eq!(config.workspace_params(), WorkspaceParams::adom("branch"));
    }

    #[test]
    fn from_json_rejects_unknown_mode() {
        let err = ProviderConfig::from_json(r#"{"workspace_mode": "normal"}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn from_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("workspace_mode".to_string(), Value::from("workspace"));
        attributes.insert("retries".to_string(), Value::Int(3));
        attributes.insert("sort_subtables".to_string(), Value::Bool(true));

        let config = ProviderConfig::from_attributes(&attributes).unwrap();
        assert_eq!(config.adom, DEFAULT_ADOM);
        assert_eq!(config.workspace_mode, WorkspaceMode::Workspace);
        assert_eq!(config.call_options().retries, 3);
        assert!(config.decode_options().sort_subtables);
    }

    #[test]
    fn from_attributes_rejects_wrong_types() {
        let mut attributes = Attributes::new();
        attributes.insert("retries".to_string(), Value::Int(-1));
        assert!(ProviderConfig::from_attributes(&attributes).is_err());

        let mut attributes = Attributes::new();
        attributes.insert("adom".to_string(), Value::Int(1));
        let err = ProviderConfig::from_attributes(&attributes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider configuration error: Invalid adom: expected a string, got Int"
        );
    }
}
