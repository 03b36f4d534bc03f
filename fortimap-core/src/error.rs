//! Error types for resource operations

use std::fmt;

use crate::client::ClientError;
use crate::encode::EncodeError;
use crate::schema::{SchemaError, TypeError};
use crate::workspace::WorkspaceOp;

/// Lifecycle verb named in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Creating,
    Reading,
    Updating,
    Deleting,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Creating => "creating",
            Operation::Reading => "reading",
            Operation::Updating => "updating",
            Operation::Deleting => "deleting",
        };
        f.write_str(verb)
    }
}

/// Error type for resource operations
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A local value could not be converted; raised before any network I/O
    #[error("Error encoding {resource_type} resource: {source}")]
    Encode {
        resource_type: String,
        #[source]
        source: EncodeError,
    },

    /// The external client failed
    #[error("Error {operation} {resource_type} resource: {source}")]
    Remote {
        operation: Operation,
        resource_type: String,
        #[source]
        source: ClientError,
    },

    /// One step of the lock/commit/unlock sequence failed
    #[error("Error issuing workspace {step} for adom {adom}: {source}")]
    WorkspaceStep {
        step: WorkspaceOp,
        adom: String,
        #[source]
        source: ClientError,
    },

    /// An addressing parameter could not be resolved from config or import options
    #[error("Missing required parameter '{name}': set it in the configuration or the import options")]
    MissingParameter { name: String },

    #[error("Unsupported workspace action '{0}', expected one of: lockbegin, lockend")]
    UnknownAction(String),

    #[error("Invalid {resource_type} configuration: {}", join_errors(errors))]
    Validation {
        resource_type: String,
        errors: Vec<TypeError>,
    },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Provider configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn join_errors(errors: &[TypeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProviderError {
    pub fn remote(operation: Operation, resource_type: impl Into<String>, source: ClientError) -> Self {
        Self::Remote {
            operation,
            resource_type: resource_type.into(),
            source,
        }
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
