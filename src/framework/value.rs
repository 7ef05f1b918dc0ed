//! State values
//!
//! The host distinguishes three states for every attribute: null
//! (omitted from configuration), unknown (deferred, not yet known) and
//! known. [`Value`] is the typed tri-state used by records; [`StateValue`]
//! is the dynamically typed tree exchanged with the host.

use super::diag::{AttrPath, Diagnostic};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fmt;

/// Typed tri-state attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    Null,
    Unknown,
    Known(T),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Null
    }
}

impl<T> Value<T> {
    pub fn known(value: T) -> Self {
        Value::Known(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known(_))
    }

    /// The materialised value, or `None` when null or unknown
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    /// The materialised value.
    ///
    /// # Panics
    ///
    /// Panics when called on a null or unknown value. Callers must check
    /// [`Value::is_known`] first, or use [`Value::as_known`].
    pub fn value(&self) -> &T {
        match self {
            Value::Known(v) => v,
            Value::Null => panic!("attempted to read the value of a null attribute"),
            Value::Unknown => panic!("attempted to read the value of an unknown attribute"),
        }
    }

    /// `None` maps to null
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Value::Known(v),
            None => Value::Null,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Value<U> {
        match self {
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
            Value::Known(v) => Value::Known(f(v)),
        }
    }

    /// Pair two values; known only when both are known, null when either is null
    pub fn zip<U>(self, other: Value<U>) -> Value<(T, U)> {
        match (self, other) {
            (Value::Known(a), Value::Known(b)) => Value::Known((a, b)),
            (Value::Null, _) | (_, Value::Null) => Value::Null,
            _ => Value::Unknown,
        }
    }

    /// The materialised value of a configuration attribute the read depends on
    pub fn require(&self, attribute: &str) -> Result<&T, Diagnostic> {
        match self {
            Value::Known(v) => Ok(v),
            Value::Null => Err(Diagnostic::attribute(
                AttrPath::root(attribute),
                "Missing required argument",
                format!("The argument \"{}\" must be set to read this data source.", attribute),
            )),
            Value::Unknown => Err(Diagnostic::attribute(
                AttrPath::root(attribute),
                "Unknown configuration value",
                format!("The argument \"{}\" is not known yet and this data source cannot be read.", attribute),
            )),
        }
    }

    /// Keep `self` when known, otherwise fall back to `other`
    pub fn or(self, other: Value<T>) -> Value<T> {
        match self {
            Value::Known(_) => self,
            _ => other,
        }
    }
}

impl Value<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.as_known().map(String::as_str)
    }
}

impl<T: Copy> Value<T> {
    pub fn get(&self) -> Option<T> {
        self.as_known().copied()
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Value::Known(value.to_string())
    }
}

impl From<String> for Value<String> {
    fn from(value: String) -> Self {
        Value::Known(value)
    }
}

impl From<i64> for Value<i64> {
    fn from(value: i64) -> Self {
        Value::Known(value)
    }
}

impl From<bool> for Value<bool> {
    fn from(value: bool) -> Self {
        Value::Known(value)
    }
}

/// Declared type of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    String,
    Int64,
    Bool,
    Set(Box<AttrType>),
    Object(ObjectType),
}

/// Attribute-type map of an object
pub type ObjectType = BTreeMap<String, AttrType>;

impl AttrType {
    pub fn set(element: AttrType) -> Self {
        AttrType::Set(Box::new(element))
    }

    pub fn object<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, AttrType)>,
        K: Into<String>,
    {
        AttrType::Object(attrs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name used in schema dumps and error messages
    pub fn name(&self) -> String {
        match self {
            AttrType::String => "string".to_string(),
            AttrType::Int64 => "int64".to_string(),
            AttrType::Bool => "bool".to_string(),
            AttrType::Set(elem) => format!("set({})", elem.name()),
            AttrType::Object(_) => "object".to_string(),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Dynamically typed state tree
#[derive(Debug, Clone)]
pub enum StateValue {
    Null,
    Unknown,
    String(String),
    Int64(i64),
    Bool(bool),
    /// Elements are unique; order carries no meaning
    Set(Vec<StateValue>),
    Object(BTreeMap<String, StateValue>),
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StateValue::Null, StateValue::Null) => true,
            (StateValue::Unknown, StateValue::Unknown) => true,
            (StateValue::String(a), StateValue::String(b)) => a == b,
            (StateValue::Int64(a), StateValue::Int64(b)) => a == b,
            (StateValue::Bool(a), StateValue::Bool(b)) => a == b,
            (StateValue::Set(a), StateValue::Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x))
            }
            (StateValue::Object(a), StateValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl StateValue {
    /// Build a set, dropping duplicate elements while keeping first occurrence order
    pub fn set(items: Vec<StateValue>) -> Self {
        let mut unique: Vec<StateValue> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        StateValue::Set(unique)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, StateValue::Unknown)
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, StateValue>> {
        match self {
            StateValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StateValue::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a top-level attribute of an object value
    pub fn get(&self, name: &str) -> Option<&StateValue> {
        self.as_object().and_then(|m| m.get(name))
    }

    /// Check the value against a declared type.
    ///
    /// Null and unknown conform to every type. Objects must carry exactly
    /// the declared attributes.
    pub fn conforms(&self, ty: &AttrType, path: &AttrPath) -> Result<(), Diagnostic> {
        match (self, ty) {
            (StateValue::Null | StateValue::Unknown, _) => Ok(()),
            (StateValue::String(_), AttrType::String) => Ok(()),
            (StateValue::Int64(_), AttrType::Int64) => Ok(()),
            (StateValue::Bool(_), AttrType::Bool) => Ok(()),
            (StateValue::Set(items), AttrType::Set(elem)) => {
                items.iter().try_for_each(|item| item.conforms(elem, path))
            }
            (StateValue::Object(map), AttrType::Object(attrs)) => {
                if let Some(missing) = attrs.keys().find(|k| !map.contains_key(*k)) {
                    return Err(Diagnostic::mapping(
                        Some(path.clone()),
                        format!("object is missing attribute \"{}\"", missing),
                    ));
                }
                if let Some(extra) = map.keys().find(|k| !attrs.contains_key(*k)) {
                    return Err(Diagnostic::mapping(
                        Some(path.clone()),
                        format!("object has undeclared attribute \"{}\"", extra),
                    ));
                }
                attrs
                    .iter()
                    .try_for_each(|(name, attr_ty)| map[name].conforms(attr_ty, &path.attr(name)))
            }
            (value, ty) => Err(Diagnostic::mapping(
                Some(path.clone()),
                format!("expected {}, got {}", ty, value.type_label()),
            )),
        }
    }

    fn type_label(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Unknown => "unknown",
            StateValue::String(_) => "string",
            StateValue::Int64(_) => "int64",
            StateValue::Bool(_) => "bool",
            StateValue::Set(_) => "set",
            StateValue::Object(_) => "object",
        }
    }

    /// Decode a JSON document into a state value of the declared type.
    ///
    /// Missing object attributes become null. The string `"(known after apply)"`
    /// is the host's marker for a deferred value and decodes as unknown.
    pub fn from_json(ty: &AttrType, json: &Json, path: &AttrPath) -> Result<StateValue, Diagnostic> {
        if json.is_null() {
            return Ok(StateValue::Null);
        }
        if json.as_str() == Some(UNKNOWN_MARKER) {
            return Ok(StateValue::Unknown);
        }
        let mismatch = || {
            Diagnostic::attribute(
                path.clone(),
                "Incorrect attribute value type",
                format!("expected {}, got {}", ty, json),
            )
        };
        match ty {
            AttrType::String => json
                .as_str()
                .map(|s| StateValue::String(s.to_string()))
                .ok_or_else(mismatch),
            AttrType::Int64 => json.as_i64().map(StateValue::Int64).ok_or_else(mismatch),
            AttrType::Bool => json.as_bool().map(StateValue::Bool).ok_or_else(mismatch),
            AttrType::Set(elem) => {
                let items = json.as_array().ok_or_else(mismatch)?;
                let decoded = items
                    .iter()
                    .map(|item| StateValue::from_json(elem, item, path))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(StateValue::set(decoded))
            }
            AttrType::Object(attrs) => {
                let map = json.as_object().ok_or_else(mismatch)?;
                if let Some(extra) = map.keys().find(|k| !attrs.contains_key(*k)) {
                    return Err(Diagnostic::attribute(
                        path.attr(extra),
                        "Unsupported argument",
                        format!("an argument named \"{}\" is not expected here", extra),
                    ));
                }
                let mut out = BTreeMap::new();
                for (name, attr_ty) in attrs {
                    let value = match map.get(name) {
                        Some(v) => StateValue::from_json(attr_ty, v, &path.attr(name))?,
                        None => StateValue::Null,
                    };
                    out.insert(name.clone(), value);
                }
                Ok(StateValue::Object(out))
            }
        }
    }

    /// Encode as JSON. Unknown values encode as the host's deferred marker.
    pub fn to_json(&self) -> Json {
        match self {
            StateValue::Null => Json::Null,
            StateValue::Unknown => Json::String(UNKNOWN_MARKER.to_string()),
            StateValue::String(s) => Json::String(s.clone()),
            StateValue::Int64(n) => Json::from(*n),
            StateValue::Bool(b) => Json::Bool(*b),
            StateValue::Set(items) => Json::Array(items.iter().map(StateValue::to_json).collect()),
            StateValue::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Textual marker the host uses for deferred values
pub const UNKNOWN_MARKER: &str = "(known after apply)";

/// Scalar types that map one-to-one onto a state value
pub trait Primitive: Sized + Clone + PartialEq {
    const TYPE: AttrType;

    fn into_state(self) -> StateValue;

    fn from_state(value: &StateValue) -> Option<Self>;
}

impl Primitive for String {
    const TYPE: AttrType = AttrType::String;

    fn into_state(self) -> StateValue {
        StateValue::String(self)
    }

    fn from_state(value: &StateValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Primitive for i64 {
    const TYPE: AttrType = AttrType::Int64;

    fn into_state(self) -> StateValue {
        StateValue::Int64(self)
    }

    fn from_state(value: &StateValue) -> Option<Self> {
        value.as_i64()
    }
}

impl Primitive for bool {
    const TYPE: AttrType = AttrType::Bool;

    fn into_state(self) -> StateValue {
        StateValue::Bool(self)
    }

    fn from_state(value: &StateValue) -> Option<Self> {
        value.as_bool()
    }
}

impl<T: Primitive> Value<T> {
    pub fn to_state(&self) -> StateValue {
        match self {
            Value::Null => StateValue::Null,
            Value::Unknown => StateValue::Unknown,
            Value::Known(v) => v.clone().into_state(),
        }
    }

    pub fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostic> {
        match value {
            StateValue::Null => Ok(Value::Null),
            StateValue::Unknown => Ok(Value::Unknown),
            other => T::from_state(other).map(Value::Known).ok_or_else(|| {
                Diagnostic::mapping(
                    Some(path.clone()),
                    format!("expected {}, got {}", T::TYPE, other.type_label()),
                )
            }),
        }
    }
}

impl<T: Primitive> Value<Vec<T>> {
    /// Encode as a set of primitives
    pub fn to_set_state(&self) -> StateValue {
        match self {
            Value::Null => StateValue::Null,
            Value::Unknown => StateValue::Unknown,
            Value::Known(items) => {
                StateValue::set(items.iter().cloned().map(Primitive::into_state).collect())
            }
        }
    }

    pub fn from_set_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostic> {
        match value {
            StateValue::Null => Ok(Value::Null),
            StateValue::Unknown => Ok(Value::Unknown),
            StateValue::Set(items) => items
                .iter()
                .map(|item| {
                    T::from_state(item).ok_or_else(|| {
                        Diagnostic::mapping(
                            Some(path.clone()),
                            format!("set element is not {}", T::TYPE),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Known),
            other => Err(Diagnostic::mapping(
                Some(path.clone()),
                format!("expected set({}), got {}", T::TYPE, other.type_label()),
            )),
        }
    }
}
