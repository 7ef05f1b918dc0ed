//! Typed records
//!
//! Records are the typed view of a configuration/state object. The
//! reader and builder here do the attribute-by-attribute plumbing so
//! entity mappers only list their fields.

use super::diag::{AttrPath, Diagnostic, Diagnostics};
use super::value::{AttrType, Primitive, StateValue, Value};
use crate::bridge;
use std::collections::BTreeMap;

/// A typed view over an object state value
pub trait Record: Sized {
    /// Read a record from configuration or state
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics>;

    /// Encode the record as state
    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics>;
}

/// A record nested inside a set or object attribute
pub trait NestedObject: Record + Clone + PartialEq {
    /// Complete attribute-type map of the object
    fn object_type() -> AttrType;
}

/// Attribute-by-attribute reader over an object value
pub struct ObjectReader<'a> {
    attrs: &'a BTreeMap<String, StateValue>,
    path: AttrPath,
    diags: Diagnostics,
}

static EMPTY: StateValue = StateValue::Null;

impl<'a> ObjectReader<'a> {
    pub fn new(value: &'a StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        match value.as_object() {
            Some(attrs) => Ok(Self {
                attrs,
                path: path.clone(),
                diags: Diagnostics::new(),
            }),
            None => Err(Diagnostic::mapping(Some(path.clone()), "expected an object value").into()),
        }
    }

    fn raw(&self, name: &str) -> &'a StateValue {
        self.attrs.get(name).unwrap_or(&EMPTY)
    }

    fn primitive<T: Primitive>(&mut self, name: &str) -> Value<T> {
        let path = self.path.attr(name);
        match Value::<T>::from_state(self.raw(name), &path) {
            Ok(v) => v,
            Err(diag) => {
                self.diags.push(diag);
                Value::Null
            }
        }
    }

    pub fn string(&mut self, name: &str) -> Value<String> {
        self.primitive(name)
    }

    pub fn int64(&mut self, name: &str) -> Value<i64> {
        self.primitive(name)
    }

    pub fn bool(&mut self, name: &str) -> Value<bool> {
        self.primitive(name)
    }

    fn primitive_set<T: Primitive>(&mut self, name: &str) -> Value<Vec<T>> {
        let path = self.path.attr(name);
        match Value::<Vec<T>>::from_set_state(self.raw(name), &path) {
            Ok(v) => v,
            Err(diag) => {
                self.diags.push(diag);
                Value::Null
            }
        }
    }

    pub fn strings(&mut self, name: &str) -> Value<Vec<String>> {
        self.primitive_set(name)
    }

    pub fn ints(&mut self, name: &str) -> Value<Vec<i64>> {
        self.primitive_set(name)
    }

    pub fn object<N: NestedObject>(&mut self, name: &str) -> Value<N> {
        let path = self.path.attr(name);
        match self.raw(name) {
            StateValue::Null => Value::Null,
            StateValue::Unknown => Value::Unknown,
            value => match N::from_state(value, &path) {
                Ok(v) => Value::Known(v),
                Err(diags) => {
                    self.diags.append(diags);
                    Value::Null
                }
            },
        }
    }

    pub fn set<N: NestedObject>(&mut self, name: &str) -> Value<Vec<N>> {
        let path = self.path.attr(name);
        match self.raw(name) {
            StateValue::Null => Value::Null,
            StateValue::Unknown => Value::Unknown,
            StateValue::Set(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match N::from_state(item, &path) {
                        Ok(v) => out.push(v),
                        Err(diags) => self.diags.append(diags),
                    }
                }
                Value::Known(out)
            }
            _ => {
                self.diags
                    .push(Diagnostic::mapping(Some(path), "expected a set value"));
                Value::Null
            }
        }
    }

    /// Hand back the record, or every diagnostic collected while reading
    pub fn finish<R>(self, record: R) -> Result<R, Diagnostics> {
        if self.diags.has_error() {
            Err(self.diags)
        } else {
            Ok(record)
        }
    }
}

/// Attribute-by-attribute builder for an object value
pub struct ObjectBuilder {
    attrs: BTreeMap<String, StateValue>,
    path: AttrPath,
    diags: Diagnostics,
}

impl ObjectBuilder {
    pub fn new(path: &AttrPath) -> Self {
        Self {
            attrs: BTreeMap::new(),
            path: path.clone(),
            diags: Diagnostics::new(),
        }
    }

    fn put(&mut self, name: &str, value: StateValue) {
        self.attrs.insert(name.to_string(), value);
    }

    pub fn string(mut self, name: &str, value: &Value<String>) -> Self {
        self.put(name, value.to_state());
        self
    }

    pub fn int64(mut self, name: &str, value: &Value<i64>) -> Self {
        self.put(name, value.to_state());
        self
    }

    pub fn bool(mut self, name: &str, value: &Value<bool>) -> Self {
        self.put(name, value.to_state());
        self
    }

    pub fn strings(mut self, name: &str, value: &Value<Vec<String>>) -> Self {
        self.put(name, value.to_set_state());
        self
    }

    pub fn ints(mut self, name: &str, value: &Value<Vec<i64>>) -> Self {
        self.put(name, value.to_set_state());
        self
    }

    pub fn object<N: NestedObject>(mut self, name: &str, value: &Value<N>) -> Self {
        let path = self.path.attr(name);
        let state = match value {
            Value::Null => StateValue::Null,
            Value::Unknown => StateValue::Unknown,
            Value::Known(item) => match item.to_state(&path) {
                Ok(state) => state,
                Err(diags) => {
                    self.diags.append(diags);
                    StateValue::Null
                }
            },
        };
        self.put(name, state);
        self
    }

    pub fn set<N: NestedObject>(mut self, name: &str, value: &Value<Vec<N>>) -> Self {
        let path = self.path.attr(name);
        let state = match value {
            Value::Null => StateValue::Null,
            Value::Unknown => StateValue::Unknown,
            Value::Known(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                for item in items {
                    match item.to_state(&path) {
                        Ok(state) => encoded.push(state),
                        Err(diags) => self.diags.append(diags),
                    }
                }
                match bridge::set_value(&N::object_type(), encoded, &path) {
                    Ok(set) => set,
                    Err(diag) => {
                        self.diags.push(diag);
                        StateValue::Null
                    }
                }
            }
        };
        self.put(name, state);
        self
    }

    /// Finish an object whose complete type is declared
    pub fn finish_typed(self, ty: &AttrType) -> Result<StateValue, Diagnostics> {
        if self.diags.has_error() {
            return Err(self.diags);
        }
        bridge::object_value(ty, self.attrs, &self.path).map_err(Diagnostics::from)
    }

    /// Finish a top-level record; its type is checked against the schema by the caller
    pub fn finish(self) -> Result<StateValue, Diagnostics> {
        if self.diags.has_error() {
            return Err(self.diags);
        }
        Ok(StateValue::Object(self.attrs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ref {
        project: Value<String>,
        id: Value<i64>,
    }

    impl Record for Ref {
        fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
            let mut r = ObjectReader::new(value, path)?;
            let record = Ref {
                project: r.string("project"),
                id: r.int64("id"),
            };
            r.finish(record)
        }

        fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
            ObjectBuilder::new(path)
                .string("project", &self.project)
                .int64("id", &self.id)
                .finish_typed(&Self::object_type())
        }
    }

    impl NestedObject for Ref {
        fn object_type() -> AttrType {
            AttrType::object([("project", AttrType::String), ("id", AttrType::Int64)])
        }
    }

    #[test]
    fn test_nested_set_round_trip() {
        let refs: Value<Vec<Ref>> = Value::Known(vec![
            Ref { project: "web".into(), id: Value::Known(1) },
            Ref { project: "api".into(), id: Value::Null },
        ]);
        let state = ObjectBuilder::new(&AttrPath::default())
            .set("refs", &refs)
            .finish()
            .unwrap();

        let mut reader = ObjectReader::new(&state, &AttrPath::default()).unwrap();
        let back: Value<Vec<Ref>> = reader.set("refs");
        assert!(reader.finish(()).is_ok());
        assert_eq!(back.as_known().map(Vec::len), Some(2));
        assert!(back.value().contains(&Ref { project: "api".into(), id: Value::Null }));
    }

    #[test]
    fn test_reader_reports_type_mismatch() {
        let state = StateValue::Object(BTreeMap::from([("id".to_string(), StateValue::String("x".into()))]));
        let mut reader = ObjectReader::new(&state, &AttrPath::default()).unwrap();
        let _ = reader.int64("id");
        let err = reader.finish(()).unwrap_err();
        assert_eq!(err.first_error().unwrap().path, Some(AttrPath::root("id")));
    }
}
