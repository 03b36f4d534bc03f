//! Differ - Compare prior state with desired configuration
//!
//! Produces the set of element-scoped paths (`sla.0.health_check`) whose
//! value differs between the last known state and the declared
//! configuration. The encoder's change-based presence oracle is built on it.

use std::collections::BTreeSet;

use crate::resource::{Attributes, Value};

/// Find changed top-level attributes between prior state and desired config
pub fn changed_attributes(prior: &Attributes, desired: &Attributes) -> Vec<String> {
    let mut changed: Vec<String> = desired
        .keys()
        .chain(prior.keys())
        .filter(|key| prior.get(*key) != desired.get(*key))
        .cloned()
        .collect();
    changed.sort();
    changed.dedup();
    changed
}

/// Find every changed path, descending into nested maps and lists
///
/// A changed nested value also marks each of its ancestors.
pub fn changed_paths(prior: &Attributes, desired: &Attributes) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    diff_maps("", prior, desired, &mut paths);
    paths
}

fn diff_maps(prefix: &str, prior: &Attributes, desired: &Attributes, out: &mut BTreeSet<String>) {
    for key in desired.keys().chain(prior.keys()) {
        let path = format!("{}{}", prefix, key);
        diff_values(&path, prior.get(key), desired.get(key), out);
    }
}

fn diff_values(path: &str, prior: Option<&Value>, desired: Option<&Value>, out: &mut BTreeSet<String>) {
    if prior == desired {
        return;
    }
    out.insert(path.to_string());

    match (prior, desired) {
        (Some(Value::List(a)), Some(Value::List(b))) => diff_lists(path, a, b, out),
        (None, Some(Value::List(items))) | (Some(Value::List(items)), None) => {
            diff_lists(path, &[], items, out)
        }
        (Some(Value::Map(a)), Some(Value::Map(b))) => diff_maps(&format!("{}.", path), a, b, out),
        (None, Some(Value::Map(m))) | (Some(Value::Map(m)), None) => {
            diff_maps(&format!("{}.", path), &Attributes::new(), m, out)
        }
        _ => {}
    }
}

fn diff_lists(path: &str, prior: &[Value], desired: &[Value], out: &mut BTreeSet<String>) {
    // Only lists of objects carry addressable sub-paths
    let has_objects = prior.iter().chain(desired).any(|v| matches!(v, Value::Map(_)));
    if !has_objects {
        return;
    }
    for index in 0..prior.len().max(desired.len()) {
        diff_values(
            &format!("{}.{}", path, index),
            prior.get(index),
            desired.get(index),
            out,
        );
    }
}
