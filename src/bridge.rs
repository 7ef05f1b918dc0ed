//! Type bridge
//!
//! Converts remote DTO fields into state values. Plain fields are always
//! known (a missing string is the empty string); optional fields that
//! were absent on the wire become null. Collections never become null:
//! an empty remote list is an empty set.

use crate::framework::diag::{AttrPath, Diagnostic};
use crate::framework::value::{AttrType, StateValue, Value};
use std::collections::BTreeMap;

pub fn string(value: &str) -> Value<String> {
    Value::Known(value.to_string())
}

pub fn opt_string(value: Option<&str>) -> Value<String> {
    Value::from_option(value.map(str::to_string))
}

pub fn int64(value: i64) -> Value<i64> {
    Value::Known(value)
}

pub fn opt_int64(value: Option<i64>) -> Value<i64> {
    Value::from_option(value)
}

pub fn boolean(value: bool) -> Value<bool> {
    Value::Known(value)
}

pub fn opt_bool(value: Option<bool>) -> Value<bool> {
    Value::from_option(value)
}

/// String with a fallback substituted when the remote value is empty
pub fn string_or(value: &str, fallback: &str) -> Value<String> {
    if value.is_empty() {
        string(fallback)
    } else {
        string(value)
    }
}

pub fn string_set(values: &[String]) -> Value<Vec<String>> {
    Value::Known(values.to_vec())
}

pub fn int64_set(values: &[i64]) -> Value<Vec<i64>> {
    Value::Known(values.to_vec())
}

/// Map each remote item into a nested object; the result is always known
pub fn object_set<D, N, F>(items: &[D], convert: F) -> Value<Vec<N>>
where
    F: Fn(&D) -> N,
{
    Value::Known(items.iter().map(convert).collect())
}

/// Optional nested object: absent on the wire becomes null
pub fn opt_object<D, N, F>(item: Option<&D>, convert: F) -> Value<N>
where
    F: FnOnce(&D) -> N,
{
    Value::from_option(item.map(convert))
}

/// Build a set whose elements must all conform to `element`
pub fn set_value(element: &AttrType, items: Vec<StateValue>, path: &AttrPath) -> Result<StateValue, Diagnostic> {
    for item in &items {
        item.conforms(element, path)?;
    }
    Ok(StateValue::set(items))
}

/// Build an object from a complete attribute map.
///
/// Every attribute declared in `ty` must be present, and nothing else.
pub fn object_value(
    ty: &AttrType,
    attrs: BTreeMap<String, StateValue>,
    path: &AttrPath,
) -> Result<StateValue, Diagnostic> {
    let AttrType::Object(declared) = ty else {
        return Err(Diagnostic::mapping(
            Some(path.clone()),
            format!("cannot build an object from type {}", ty),
        ));
    };
    if let Some(missing) = declared.keys().find(|k| !attrs.contains_key(*k)) {
        return Err(Diagnostic::mapping(
            Some(path.clone()),
            format!("missing attribute \"{}\" in object value", missing),
        ));
    }
    let value = StateValue::Object(attrs);
    value.conforms(ty, path)?;
    Ok(value)
}
