//! Client - Trait abstracting the FortiManager REST collaborator
//!
//! Transport, authentication and retries live behind this trait. The mapper
//! hands it a finished request body plus addressing parameters and gets raw
//! JSON back.

mod memory;

pub use memory::{Failure, MemoryClient, RecordedCall};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::encode::WireObject;
use crate::params::{ParamContext, WorkspaceParams};
use crate::workspace::WorkspaceOp;

/// Error returned by the external client
#[derive(Debug)]
pub struct ClientError {
    pub message: String,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}", self.message, cause),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Transport policy passed explicitly with every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Attempts after the first failure
    pub retries: u32,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self { retries: 1 }
    }
}

/// Addressing of one object call
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// API object type (e.g., "SystemSdwanService")
    pub object_type: &'a str,
    pub params: &'a ParamContext,
    pub workspace: &'a WorkspaceParams,
    pub options: CallOptions,
}

/// External REST client
///
/// `read` returns `Ok(None)` when the object does not exist.
#[async_trait]
pub trait ConfigClient: Send + Sync {
    async fn create(&self, call: Call<'_>, body: &WireObject) -> ClientResult<Option<JsonValue>>;

    async fn read(&self, call: Call<'_>, id: &str) -> ClientResult<Option<JsonValue>>;

    async fn update(&self, call: Call<'_>, id: &str, body: &WireObject) -> ClientResult<Option<JsonValue>>;

    async fn delete(&self, call: Call<'_>, id: &str) -> ClientResult<()>;

    /// Issue one lock/commit/unlock step against an ADOM workspace
    async fn workspace_action(
        &self,
        adom: &str,
        op: WorkspaceOp,
        target: &str,
        param: &str,
        options: CallOptions,
    ) -> ClientResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_display_includes_cause() {
        let io = std::io::Error::other("connection reset");
        let err = ClientError::new("request failed").with_cause(io);
        assert_eq!(err.to_string(), "request failed: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn default_call_options_retry_once() {
        assert_eq!(CallOptions::default().retries, 1);
    }
}
