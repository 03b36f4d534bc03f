//! Adapter - Bind an object descriptor to the client's lifecycle verbs
//!
//! One adapter per resource type. Each verb is a straight sequence
//! (validate, resolve parameters, encode, call, decode) that returns the
//! first error it meets. Nothing is kept between verbs; the remote system is
//! the only record.

use serde_json::Value as JsonValue;

use crate::client::{Call, ConfigClient};
use crate::config::ProviderConfig;
use crate::decode::{decode_field, decode_with};
use crate::encode::{WireObject, encode, redact};
use crate::error::{Operation, ProviderError, ProviderResult};
use crate::params::{ImportOptions, ParamContext, ScopeSpec, WorkspaceParams};
use crate::presence::ChangeSet;
use crate::resource::{Attributes, ResourceData, Value};
use crate::schema::ObjectDescriptor;

/// Collaborators of one operation
#[derive(Clone, Copy)]
pub struct Session<'a> {
    pub client: &'a dyn ConfigClient,
    pub config: &'a ProviderConfig,
    /// Consulted for addressing parameters missing from the declared config
    pub import: &'a ImportOptions,
}

impl<'a> Session<'a> {
    pub fn new(client: &'a dyn ConfigClient, config: &'a ProviderConfig, import: &'a ImportOptions) -> Self {
        Self {
            client,
            config,
            import,
        }
    }

    fn call<'b>(&'b self, object_type: &'b str, params: &'b ParamContext, workspace: &'b WorkspaceParams) -> Call<'b> {
        Call {
            object_type,
            params,
            workspace,
            options: self.config.call_options(),
        }
    }
}

/// Result of a Read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// State was refreshed from the remote object
    Found,
    /// The remote object no longer exists; local identity was cleared
    Gone,
}

/// CRUD binding for one resource type
#[derive(Debug, Clone)]
pub struct ResourceAdapter {
    resource_type: String,
    api_type: String,
    descriptor: ObjectDescriptor,
    scope: ScopeSpec,
}

impl ResourceAdapter {
    pub fn new(
        resource_type: impl Into<String>,
        api_type: impl Into<String>,
        descriptor: ObjectDescriptor,
        scope: ScopeSpec,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            api_type: api_type.into(),
            descriptor,
            scope,
        }
    }

    /// Local resource type (e.g., "system_sdwan_service")
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// API object type (e.g., "SystemSdwanService")
    pub fn api_type(&self) -> &str {
        &self.api_type
    }

    pub fn descriptor(&self) -> &ObjectDescriptor {
        &self.descriptor
    }

    pub fn scope(&self) -> &ScopeSpec {
        &self.scope
    }

    /// Identity of an instance
    ///
    /// Taken from the key field of the declared config, else from the same
    /// field of the create/update response. Key-less (singleton) types use
    /// the descriptor name.
    pub fn derive_id(&self, local: &Attributes, response: Option<&JsonValue>) -> ProviderResult<String> {
        let Some(key) = self.descriptor.key_field() else {
            return Ok(self.descriptor.name().to_string());
        };

        local
            .get(&key.name)
            .and_then(Value::to_key_string)
            .or_else(|| {
                response
                    .and_then(|r| r.get(&key.wire_name))
                    .and_then(|wire| decode_field(key, wire, Default::default()))
                    .and_then(|v| v.to_key_string())
            })
            .ok_or_else(|| ProviderError::missing_parameter(key.name.clone()))
    }

    pub async fn create(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let params = self.prepare(session, data)?;
        let body = self.encode_changes(data, Operation::Creating)?;

        let workspace = session.config.workspace_params();
        let response = session
            .client
            .create(session.call(&self.api_type, &params, &workspace), &body)
            .await
            .map_err(|e| ProviderError::remote(Operation::Creating, &self.api_type, e))?;

        data.id = Some(self.derive_id(&data.config, response.as_ref())?);
        self.read(session, data).await?;
        Ok(())
    }

    pub async fn read(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<ReadOutcome> {
        let Some(id) = data.id.clone() else {
            return Ok(ReadOutcome::Gone);
        };
        let params = self.scope.resolve(data, session.import)?;

        let workspace = WorkspaceParams::none();
        let response = session
            .client
            .read(session.call(&self.api_type, &params, &workspace), &id)
            .await
            .map_err(|e| ProviderError::remote(Operation::Reading, &self.api_type, e))?;

        let decoded = response
            .as_ref()
            .and_then(|wire| decode_with(&self.descriptor, wire, session.config.decode_options()))
            .filter(|attributes| !attributes.is_empty());
        let Some(mut state) = decoded else {
            log::warn!(
                "{} {} no longer exists, removing it from state",
                self.api_type,
                id
            );
            data.clear();
            return Ok(ReadOutcome::Gone);
        };

        for binding in self.scope.bindings() {
            if let Some(value) = params.get(binding.param) {
                state.insert(binding.attribute.to_string(), Value::from(value));
            }
        }
        data.state = state;
        Ok(ReadOutcome::Found)
    }

    pub async fn update(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = self.identity(data)?;
        let params = self.prepare(session, data)?;
        let body = self.encode_changes(data, Operation::Updating)?;

        let workspace = session.config.workspace_params();
        let response = session
            .client
            .update(session.call(&self.api_type, &params, &workspace), &id, &body)
            .await
            .map_err(|e| ProviderError::remote(Operation::Updating, &self.api_type, e))?;

        // The key field may have changed
        data.id = Some(self.derive_id(&data.config, response.as_ref())?);
        self.read(session, data).await?;
        Ok(())
    }

    pub async fn delete(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let id = self.identity(data)?;
        let params = self.scope.resolve(data, session.import)?;

        let workspace = session.config.workspace_params();
        session
            .client
            .delete(session.call(&self.api_type, &params, &workspace), &id)
            .await
            .map_err(|e| ProviderError::remote(Operation::Deleting, &self.api_type, e))?;

        data.clear();
        Ok(())
    }

    /// Adopt an existing remote object by identity
    ///
    /// Addressing parameters come from the session's import options. Returns
    /// `None` when no such object exists.
    pub async fn import(&self, session: &Session<'_>, id: &str) -> ProviderResult<Option<ResourceData>> {
        let mut data = ResourceData::new(&self.resource_type).with_id(id);
        match self.read(session, &mut data).await? {
            ReadOutcome::Found => Ok(Some(data)),
            ReadOutcome::Gone => Ok(None),
        }
    }

    fn identity(&self, data: &ResourceData) -> ProviderResult<String> {
        data.id.clone().ok_or_else(|| {
            ProviderError::configuration(format!("{} resource has no identity", self.api_type))
        })
    }

    /// Validate the declared config and resolve its addressing parameters
    fn prepare(&self, session: &Session<'_>, data: &ResourceData) -> ProviderResult<ParamContext> {
        self.descriptor
            .validate(&data.config)
            .map_err(|errors| ProviderError::Validation {
                resource_type: self.api_type.clone(),
                errors,
            })?;
        self.scope.resolve(data, session.import)
    }

    /// Encode what the caller set or changed relative to the last known state
    fn encode_changes(&self, data: &ResourceData, operation: Operation) -> ProviderResult<WireObject> {
        let planned = self.planned(data);
        let changes = ChangeSet::between(&data.state, &planned);
        let body = encode(&self.descriptor, &planned, &changes).map_err(|source| ProviderError::Encode {
            resource_type: self.api_type.clone(),
            source,
        })?;

        log::debug!(
            "{} {} request: {}",
            operation,
            self.api_type,
            redact(&self.descriptor, &JsonValue::Object(body.clone()))
        );
        Ok(body)
    }

    /// Declared config, with computed values the caller left unset carried
    /// over from state (nested blocks included)
    fn planned(&self, data: &ResourceData) -> Attributes {
        let mut planned = data.config.clone();
        carry_computed(&self.descriptor, &mut planned, &data.state);
        planned
    }
}

fn carry_computed(descriptor: &ObjectDescriptor, planned: &mut Attributes, state: &Attributes) {
    for field in descriptor.fields() {
        let Some(prior) = state.get(&field.name) else {
            continue;
        };

        if !planned.contains_key(&field.name) {
            if field.computed {
                planned.insert(field.name.clone(), prior.clone());
            }
            continue;
        }

        let (Some(child), Some(prior_items)) = (field.child(), prior.as_list()) else {
            continue;
        };
        let Some(Value::List(items)) = planned.get_mut(&field.name) else {
            continue;
        };
        for (index, item) in items.iter_mut().enumerate() {
            let Value::Map(element) = item else {
                continue;
            };
            if let Some(Value::Map(prior_element)) = matching_element(child, element, prior_items, index) {
                carry_computed(child, element, prior_element);
            }
        }
    }
}

/// Prior element with the same key value, or at the same position for key-less blocks
fn matching_element<'a>(
    child: &ObjectDescriptor,
    element: &Attributes,
    prior: &'a [Value],
    index: usize,
) -> Option<&'a Value> {
    let keyed = child
        .key_field()
        .and_then(|key| element.get(&key.name).map(|value| (&key.name, value)));

    match keyed {
        Some((name, value)) => prior
            .iter()
            .find(|candidate| candidate.as_map().and_then(|m| m.get(name)) == Some(value)),
        None => prior.get(index),
    }
}
