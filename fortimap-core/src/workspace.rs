//! Workspace - ADOM lock/commit/unlock protocol
//!
//! In workspace mode FortiManager only accepts changes inside a locked ADOM,
//! and they take effect on commit. The `exec_workspace_action` pseudo-resource
//! brackets a set of changes: a `lockbegin` instance takes the lock when
//! created, a `lockend` instance commits and releases it. Destroying either
//! instance issues the opposite steps.
//!
//! Steps are issued strictly in order; the first failure aborts the rest and
//! is reported with the step that failed.

use std::fmt;
use std::str::FromStr;

use crate::adapter::{ReadOutcome, Session};
use crate::error::{ProviderError, ProviderResult};
use crate::resource::{Attributes, ResourceData, Value};
use crate::schema::{AttributeType, FieldDescriptor, ObjectDescriptor, SchemaError};

/// One protocol message sent to the remote workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceOp {
    Lock,
    Commit,
    Unlock,
}

impl WorkspaceOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceOp::Lock => "lock",
            WorkspaceOp::Commit => "commit",
            WorkspaceOp::Unlock => "unlock",
        }
    }
}

impl fmt::Display for WorkspaceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized values of the `action` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceAction {
    LockBegin,
    LockEnd,
}

impl WorkspaceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceAction::LockBegin => "lockbegin",
            WorkspaceAction::LockEnd => "lockend",
        }
    }

    /// Steps issued when the instance is created
    pub fn apply_steps(&self) -> &'static [WorkspaceOp] {
        match self {
            WorkspaceAction::LockBegin => &[WorkspaceOp::Lock],
            WorkspaceAction::LockEnd => &[WorkspaceOp::Commit, WorkspaceOp::Unlock],
        }
    }

    /// Steps issued when the instance is destroyed
    ///
    /// A lock that was taken but never ended is still released; an ended
    /// lock is taken again.
    pub fn rollback_steps(&self) -> &'static [WorkspaceOp] {
        match self {
            WorkspaceAction::LockBegin => &[WorkspaceOp::Commit, WorkspaceOp::Unlock],
            WorkspaceAction::LockEnd => &[WorkspaceOp::Lock],
        }
    }
}

impl FromStr for WorkspaceAction {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lockbegin" => Ok(WorkspaceAction::LockBegin),
            "lockend" => Ok(WorkspaceAction::LockEnd),
            other => Err(ProviderError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for WorkspaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a workspace action instance
pub fn workspace_action_id(adom: &str, action: &str, target: &str, param: &str) -> String {
    format!("workspaceaction{}{}{}{}", adom, action, target, param).replace(['/', '\\'], "_")
}

/// Resolved attributes of one workspace action instance
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActionRequest {
    adom: String,
    action: WorkspaceAction,
    target: String,
    param: String,
}

impl ActionRequest {
    fn from_data(data: &ResourceData, session: &Session<'_>) -> ProviderResult<Self> {
        let text = |key: &str| data.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

        let action = text("action").parse()?;
        let adom = match text("adom") {
            adom if adom.is_empty() => session.config.adom.clone(),
            adom => adom,
        };

        Ok(Self {
            adom,
            action,
            target: text("target"),
            param: text("param"),
        })
    }

    fn id(&self) -> String {
        workspace_action_id(&self.adom, self.action.as_str(), &self.target, &self.param)
    }

    fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("adom".to_string(), Value::from(self.adom.as_str()));
        attributes.insert("action".to_string(), Value::from(self.action.as_str()));
        attributes.insert("target".to_string(), Value::from(self.target.as_str()));
        attributes.insert("param".to_string(), Value::from(self.param.as_str()));
        attributes
    }
}

/// The `exec_workspace_action` pseudo-resource
#[derive(Debug, Clone)]
pub struct WorkspaceActionResource {
    descriptor: ObjectDescriptor,
}

impl WorkspaceActionResource {
    pub const RESOURCE_TYPE: &'static str = "exec_workspace_action";

    pub fn new() -> Result<Self, SchemaError> {
        let descriptor = ObjectDescriptor::builder("ExecWorkspaceAction")
            .with_description("Lock, commit and unlock an ADOM workspace")
            .field(
                FieldDescriptor::scalar("adom", AttributeType::String)
                    .computed()
                    .with_description("ADOM to act on; defaults to the provider ADOM"),
            )
            // Kept as a plain string so an unknown action reaches the protocol error
            .field(
                FieldDescriptor::scalar("action", AttributeType::String)
                    .required()
                    .with_description("lockbegin or lockend"),
            )
            .field(FieldDescriptor::scalar("target", AttributeType::String))
            .field(FieldDescriptor::scalar("param", AttributeType::String))
            .build()?;
        Ok(Self { descriptor })
    }

    pub fn descriptor(&self) -> &ObjectDescriptor {
        &self.descriptor
    }

    pub async fn create(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let request = ActionRequest::from_data(data, session)?;
        self.run(session, &request, request.action.apply_steps()).await?;

        data.id = Some(request.id());
        data.state = request.attributes();
        Ok(())
    }

    /// Nothing to fetch remotely; state mirrors the declared action
    pub async fn read(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<ReadOutcome> {
        if !data.exists() {
            return Ok(ReadOutcome::Gone);
        }
        let request = ActionRequest::from_data(data, session)?;
        data.state = request.attributes();
        Ok(ReadOutcome::Found)
    }

    /// Changing any attribute issues the apply steps again
    pub async fn update(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        self.create(session, data).await
    }

    pub async fn delete(&self, session: &Session<'_>, data: &mut ResourceData) -> ProviderResult<()> {
        let request = ActionRequest::from_data(data, session)?;
        self.run(session, &request, request.action.rollback_steps()).await?;

        data.clear();
        Ok(())
    }

    async fn run(
        &self,
        session: &Session<'_>,
        request: &ActionRequest,
        steps: &[WorkspaceOp],
    ) -> ProviderResult<()> {
        for &step in steps {
            log::info!(
                "workspace {} adom={} target={} param={}",
                step,
                request.adom,
                request.target,
                request.param
            );
            session
                .client
                .workspace_action(
                    &request.adom,
                    step,
                    &request.target,
                    &request.param,
                    session.config.call_options(),
                )
                .await
                .map_err(|source| ProviderError::WorkspaceStep {
                    step,
                    adom: request.adom.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}
