//! Presence - Decide which fields the encoder emits
//!
//! A field is sent only when the oracle reports it present. This is what
//! lets an update carry just the caller's changes without clobbering values
//! the server manages.

use std::collections::BTreeSet;

use crate::differ::changed_paths;
use crate::resource::{Attributes, Value};
use crate::schema::FieldDescriptor;

/// Oracle answering "was this field set or changed by the caller"
pub trait Presence {
    /// `path` is element-scoped (e.g., "sla.0.health_check"); `value` is the
    /// local value after defaults, if any
    fn is_present(&self, path: &str, field: &FieldDescriptor, value: Option<&Value>) -> bool;
}

/// Every field holding a local value is present
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPresent;

impl Presence for AlwaysPresent {
    fn is_present(&self, _path: &str, _field: &FieldDescriptor, value: Option<&Value>) -> bool {
        value.is_some()
    }
}

/// Change-based oracle
///
/// Present when the path changed, or when the field holds a non-zero value
/// and is not computed. Inside a changed object list every non-computed
/// value is present, so each element sent is whole. An unchanged computed
/// value is never sent back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changed: BTreeSet<String>,
}

impl ChangeSet {
    /// Changes between the last known state and the declared configuration
    pub fn between(prior: &Attributes, desired: &Attributes) -> Self {
        Self {
            changed: changed_paths(prior, desired),
        }
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            changed: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.changed.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }
}

impl Presence for ChangeSet {
    fn is_present(&self, path: &str, field: &FieldDescriptor, value: Option<&Value>) -> bool {
        if self.contains(path) {
            return true;
        }
        match value {
            Some(v) if !field.computed => {
                !v.is_zero() || enclosing_list(path).is_some_and(|list| self.contains(list))
            }
            _ => false,
        }
    }
}

/// Path of the object list holding the element a nested path belongs to
/// ("sla.1.id" -> "sla")
fn enclosing_list(path: &str) -> Option<&str> {
    let (element, _) = path.rsplit_once('.')?;
    let (list, _) = element.rsplit_once('.')?;
    Some(list)
}
