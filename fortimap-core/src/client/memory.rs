//! In-memory client
//!
//! Keeps objects in process and records every call in issue order. Useful
//! for dry runs and for observing exactly what the mapper sends.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::{Call, CallOptions, ClientError, ClientResult, ConfigClient};
use crate::encode::WireObject;
use crate::params::{ParamContext, WorkspaceParams};
use crate::workspace::WorkspaceOp;

/// One call received by [`MemoryClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Create {
        object_type: String,
        params: ParamContext,
        workspace: WorkspaceParams,
        body: JsonValue,
    },
    Read {
        object_type: String,
        params: ParamContext,
        id: String,
    },
    Update {
        object_type: String,
        params: ParamContext,
        workspace: WorkspaceParams,
        id: String,
        body: JsonValue,
    },
    Delete {
        object_type: String,
        params: ParamContext,
        workspace: WorkspaceParams,
        id: String,
    },
    Workspace {
        adom: String,
        op: WorkspaceOp,
        target: String,
        param: String,
    },
}

/// Call kind a [`MemoryClient`] can be told to reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Create,
    Read,
    Update,
    Delete,
    Workspace(WorkspaceOp),
}

/// Client backed by a process-local object store
#[derive(Debug, Default)]
pub struct MemoryClient {
    /// API object type -> wire name of its key field
    keys: HashMap<String, String>,
    objects: Mutex<HashMap<String, WireObject>>,
    calls: Mutex<Vec<RecordedCall>>,
    failures: Vec<Failure>,
    last_options: Mutex<Option<CallOptions>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the wire key of an object type; objects without one are singletons
    pub fn with_key(mut self, object_type: impl Into<String>, wire_key: impl Into<String>) -> Self {
        self.keys.insert(object_type.into(), wire_key.into());
        self
    }

    /// Reject every call of the given kind (the call is still recorded)
    pub fn failing(mut self, failure: Failure) -> Self {
        self.failures.push(failure);
        self
    }

    /// Store an object as if it already existed remotely
    pub fn seed(&self, object_type: &str, params: &ParamContext, id: &str, object: JsonValue) {
        if let JsonValue::Object(object) = object {
            lock(&self.objects).insert(storage_key(object_type, params, id), object);
        }
    }

    /// Stored object, if any
    pub fn object(&self, object_type: &str, params: &ParamContext, id: &str) -> Option<JsonValue> {
        lock(&self.objects)
            .get(&storage_key(object_type, params, id))
            .cloned()
            .map(JsonValue::Object)
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Workspace steps received so far, in order
    pub fn workspace_ops(&self) -> Vec<WorkspaceOp> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Workspace { op, .. } => Some(*op),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Options passed with the most recent call
    pub fn last_options(&self) -> Option<CallOptions> {
        *lock(&self.last_options)
    }

    fn record(&self, call: RecordedCall, options: CallOptions) {
        lock(&self.calls).push(call);
        *lock(&self.last_options) = Some(options);
    }

    fn check(&self, failure: Failure) -> ClientResult<()> {
        if self.failures.contains(&failure) {
            Err(ClientError::new(format!("injected {:?} failure", failure)))
        } else {
            Ok(())
        }
    }

    fn object_id(&self, object_type: &str, object: &WireObject) -> String {
        self.keys
            .get(object_type)
            .and_then(|key| object.get(key))
            .and_then(|value| match value {
                JsonValue::String(s) => Some(s.clone()),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| object_type.to_string())
    }
}

fn storage_key(object_type: &str, params: &ParamContext, id: &str) -> String {
    format!("{}|{}|{}", object_type, params, id)
}

#[async_trait]
impl ConfigClient for MemoryClient {
    async fn create(&self, call: Call<'_>, body: &WireObject) -> ClientResult<Option<JsonValue>> {
        self.record(
            RecordedCall::Create {
                object_type: call.object_type.to_string(),
                params: call.params.clone(),
                workspace: call.workspace.clone(),
                body: JsonValue::Object(body.clone()),
            },
            call.options,
        );
        self.check(Failure::Create)?;

        let id = self.object_id(call.object_type, body);
        let key = storage_key(call.object_type, call.params, &id);
        let mut objects = lock(&self.objects);
        if objects.contains_key(&key) {
            return Err(ClientError::new(format!("object '{}' already exists", id)));
        }
        objects.insert(key, body.clone());
        Ok(Some(JsonValue::Object(body.clone())))
    }

    async fn read(&self, call: Call<'_>, id: &str) -> ClientResult<Option<JsonValue>> {
        self.record(
            RecordedCall::Read {
                object_type: call.object_type.to_string(),
                params: call.params.clone(),
                id: id.to_string(),
            },
            call.options,
        );
        self.check(Failure::Read)?;

        Ok(self.object(call.object_type, call.params, id))
    }

    async fn update(&self, call: Call<'_>, id: &str, body: &WireObject) -> ClientResult<Option<JsonValue>> {
        self.record(
            RecordedCall::Update {
                object_type: call.object_type.to_string(),
                params: call.params.clone(),
                workspace: call.workspace.clone(),
                id: id.to_string(),
                body: JsonValue::Object(body.clone()),
            },
            call.options,
        );
        self.check(Failure::Update)?;

        let mut objects = lock(&self.objects);
        let mut object = objects
            .remove(&storage_key(call.object_type, call.params, id))
            .ok_or_else(|| ClientError::new(format!("object '{}' does not exist", id)))?;
        for (key, value) in body {
            object.insert(key.clone(), value.clone());
        }

        let new_id = self.object_id(call.object_type, &object);
        objects.insert(storage_key(call.object_type, call.params, &new_id), object.clone());
        Ok(Some(JsonValue::Object(object)))
    }

    async fn delete(&self, call: Call<'_>, id: &str) -> ClientResult<()> {
        self.record(
            RecordedCall::Delete {
                object_type: call.object_type.to_string(),
                params: call.params.clone(),
                workspace: call.workspace.clone(),
                id: id.to_string(),
            },
            call.options,
        );
        self.check(Failure::Delete)?;

        lock(&self.objects)
            .remove(&storage_key(call.object_type, call.params, id))
            .map(|_| ())
            .ok_or_else(|| ClientError::new(format!("object '{}' does not exist", id)))
    }

    async fn workspace_action(
        &self,
        adom: &str,
        op: WorkspaceOp,
        target: &str,
        param: &str,
        options: CallOptions,
    ) -> ClientResult<()> {
        self.record(
            RecordedCall::Workspace {
                adom: adom.to_string(),
                op,
                target: target.to_string(),
                param: param.to_string(),
            },
            options,
        );
        self.check(Failure::Workspace(op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call<'a>(params: &'a ParamContext, workspace: &'a WorkspaceParams) -> Call<'a> {
        Call {
            object_type: "SystemSdwanService",
            params,
            workspace,
            options: CallOptions::default(),
        }
    }

    #[tokio::test]
    async fn create_read_update_delete() {
        let client = MemoryClient::new().with_key("SystemSdwanService", "id");
        let params = ParamContext::new().with("device", "FGT-A").with("vdom", "root");
        let ws = WorkspaceParams::none();

        let body = json!({"id": 7, "name": "to-dc"});
        let JsonValue::Object(body) = body else { unreachable!() };
        client.create(call(&params, &ws), &body).await.unwrap();

        let read = client.read(call(&params, &ws), "7").await.unwrap();
        assert_eq!(read, Some(json!({"id": 7, "name": "to-dc"})));

        let JsonValue::Object(patch) = json!({"id": 8}) else { unreachable!() };
        client.update(call(&params, &ws), "7", &patch).await.unwrap();
        assert_eq!(client.read(call(&params, &ws), "7").await.unwrap(), None);
        assert_eq!(
            client.read(call(&params, &ws), "8").await.unwrap(),
            Some(json!({"id": 8, "name": "to-dc"}))
        );

        client.delete(call(&params, &ws), "8").await.unwrap();
        assert!(client.delete(call(&params, &ws), "8").await.is_err());
        assert_eq!(client.calls().len(), 7);
    }

    #[tokio::test]
    async fn objects_are_scoped_by_params() {
        let client = MemoryClient::new().with_key("SystemSdwanService", "id");
        let a = ParamContext::new().with("device", "FGT-A");
        let b = ParamContext::new().with("device", "FGT-B");
        client.seed("SystemSdwanService", &a, "1", json!({"id": 1}));

        let ws = WorkspaceParams::none();
        assert!(client.read(call(&a, &ws), "1").await.unwrap().is_some());
        assert!(client.read(call(&b, &ws), "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failure_is_recorded() {
        let client = MemoryClient::new().failing(Failure::Workspace(WorkspaceOp::Commit));
        let err = client
            .workspace_action("root", WorkspaceOp::Commit, "", "", CallOptions { retries: 3 })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Commit"));
        assert_eq!(client.workspace_ops(), vec![WorkspaceOp::Commit]);
        assert_eq!(client.last_options(), Some(CallOptions { retries: 3 }));
    }
}
