//! fortimap Core
//!
//! Core library for mapping declarative resource state onto FortiManager
//! configuration objects. A resource type is declared once as an
//! [`ObjectDescriptor`](schema::ObjectDescriptor); the generic decoder and
//! encoder translate between local state and API payloads, and the
//! [`ResourceAdapter`](adapter::ResourceAdapter) binds a descriptor to the
//! create/read/update/delete verbs of an external client.

pub mod adapter;
pub mod client;
pub mod config;
pub mod decode;
pub mod differ;
pub mod encode;
pub mod error;
pub mod params;
pub mod presence;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod transform;
pub mod workspace;

pub use adapter::{ReadOutcome, ResourceAdapter, Session};
pub use client::{ClientError, ConfigClient, MemoryClient};
pub use config::ProviderConfig;
pub use error::{Operation, ProviderError, ProviderResult};
pub use provider::{BoxFuture, Provider};
pub use resource::{Attributes, ResourceData, Value};
pub use schema::{AttributeType, FieldDescriptor, FieldKind, ObjectDescriptor};
