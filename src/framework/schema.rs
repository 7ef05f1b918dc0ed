//! Data-source schemas
//!
//! A schema declares every attribute a data source accepts or emits,
//! with its type, its configuration mode, and the validators run on
//! configuration before any network call.

use super::diag::{AttrPath, Diagnostic, Diagnostics};
use super::value::{AttrType, StateValue};
use crate::validators::Validator;
use serde_json::{json, Value as Json};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// How an attribute may be set in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Must be set in configuration
    Required,
    /// May be set in configuration; never filled in by a read
    Optional,
    /// Filled in by the read; must not be set in configuration
    Computed,
    /// May be set in configuration; filled in by the read otherwise
    OptionalComputed,
}

impl Mode {
    fn as_str(&self) -> &'static str {
        match self {
            Mode::Required => "required",
            Mode::Optional => "optional",
            Mode::Computed => "computed",
            Mode::OptionalComputed => "optional+computed",
        }
    }
}

/// A single schema attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub ty: AttrType,
    pub mode: Mode,
    pub sensitive: bool,
    pub description: &'static str,
    pub validators: Vec<Validator>,
    /// Documented value set of a computed enum attribute
    pub values: &'static [&'static str],
}

impl Attribute {
    fn new(ty: AttrType, mode: Mode) -> Self {
        Self {
            ty,
            mode,
            sensitive: false,
            description: "",
            validators: Vec::new(),
            values: &[],
        }
    }

    pub fn required(ty: AttrType) -> Self {
        Self::new(ty, Mode::Required)
    }

    pub fn optional(ty: AttrType) -> Self {
        Self::new(ty, Mode::Optional)
    }

    pub fn computed(ty: AttrType) -> Self {
        Self::new(ty, Mode::Computed)
    }

    pub fn optional_computed(ty: AttrType) -> Self {
        Self::new(ty, Mode::OptionalComputed)
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn values(mut self, values: &'static [&'static str]) -> Self {
        self.values = values;
        self
    }

    pub fn is_configurable(&self) -> bool {
        self.mode != Mode::Computed
    }
}

/// Cross-attribute rule checked against the whole configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidator {
    /// Exactly one of the named attributes must be non-null
    ExactlyOneOf(Vec<&'static str>),
}

impl ConfigValidator {
    fn validate(&self, config: &BTreeMap<String, StateValue>, diags: &mut Diagnostics) {
        match self {
            ConfigValidator::ExactlyOneOf(names) => {
                let values: Vec<_> = names
                    .iter()
                    .map(|name| (*name, config.get(*name).unwrap_or(&StateValue::Null)))
                    .collect();
                // A deferred selector may still resolve to null; decide later.
                if values.iter().any(|(_, v)| v.is_unknown()) {
                    return;
                }
                let set: Vec<&str> = values
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(name, _)| *name)
                    .collect();
                let listed = format!("[{}]", names.join(","));
                match set.as_slice() {
                    [_] => {}
                    [] => diags.push(Diagnostic::attribute(
                        AttrPath::root(names.first().copied().unwrap_or_default()),
                        "Invalid Attribute Combination",
                        format!(
                            "No attribute specified when one (and only one) of {} is required",
                            listed
                        ),
                    )),
                    [_, second, ..] => diags.push(Diagnostic::attribute(
                        AttrPath::root(second),
                        "Invalid Attribute Combination",
                        format!("{} attributes specified when one (and only one) of {} is required", set.len(), listed),
                    )),
                }
            }
        }
    }
}

/// Schema of a data source
#[derive(Debug, Clone)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<String, Attribute>,
    pub config_validators: Vec<ConfigValidator>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: BTreeMap::new(),
            config_validators: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Add several attributes at once; later entries replace earlier ones
    pub fn attrs<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Attribute)>,
    {
        for (name, attribute) in attributes {
            self.attributes.insert(name.to_string(), attribute);
        }
        self
    }

    pub fn exactly_one_of(mut self, names: &[&'static str]) -> Self {
        self.config_validators
            .push(ConfigValidator::ExactlyOneOf(names.to_vec()));
        self
    }

    /// Object type of the whole configuration/state tree
    pub fn object_type(&self) -> AttrType {
        AttrType::Object(
            self.attributes
                .iter()
                .map(|(name, attr)| (name.clone(), attr.ty.clone()))
                .collect(),
        )
    }

    /// Configuration with every absent attribute set to null
    fn fill_absent<'a>(&self, config: &'a StateValue) -> Cow<'a, StateValue> {
        match config.as_object() {
            Some(map) if self.attributes.keys().any(|name| !map.contains_key(name)) => {
                let mut map = map.clone();
                for name in self.attributes.keys() {
                    map.entry(name.clone()).or_insert(StateValue::Null);
                }
                Cow::Owned(StateValue::Object(map))
            }
            _ => Cow::Borrowed(config),
        }
    }

    /// Validate a configuration object.
    ///
    /// Absent attributes count as null. Checks types, required and
    /// read-only attributes, attribute validators, then cross-attribute
    /// rules.
    pub fn validate_config(&self, config: &StateValue) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let config = self.fill_absent(config);
        if let Err(diag) = config.conforms(&self.object_type(), &AttrPath::default()) {
            diags.push(Diagnostic {
                kind: super::diag::DiagnosticKind::Configuration,
                ..diag
            });
            return diags;
        }
        let Some(map) = config.as_object() else {
            diags.push(Diagnostic::error(
                super::diag::DiagnosticKind::Configuration,
                "Invalid configuration",
                "configuration must be an object",
            ));
            return diags;
        };

        for (name, attr) in &self.attributes {
            let path = AttrPath::root(name);
            let value = map.get(name).unwrap_or(&StateValue::Null);
            match attr.mode {
                Mode::Required if value.is_null() => diags.push(Diagnostic::attribute(
                    path,
                    "Missing required argument",
                    format!("The argument \"{}\" is required, but no definition was found.", name),
                )),
                Mode::Computed if !value.is_null() => diags.push(Diagnostic::attribute(
                    path,
                    "Invalid Configuration for Read-Only Attribute",
                    format!("Cannot set value for attribute \"{}\": it is computed by the data source.", name),
                )),
                _ => {
                    if value.is_null() || value.is_unknown() {
                        continue;
                    }
                    for validator in &attr.validators {
                        validator.validate(&path, value, &mut diags);
                    }
                }
            }
        }

        for rule in &self.config_validators {
            rule.validate(map, &mut diags);
        }

        diags
    }

    /// Machine-readable description of the schema
    pub fn to_json(&self) -> Json {
        let attributes: serde_json::Map<String, Json> = self
            .attributes
            .iter()
            .map(|(name, attr)| {
                let mut entry = json!({
                    "type": attr.ty.name(),
                    "mode": attr.mode.as_str(),
                });
                if attr.sensitive {
                    entry["sensitive"] = Json::Bool(true);
                }
                if !attr.description.is_empty() {
                    entry["description"] = Json::String(attr.description.to_string());
                }
                if !attr.values.is_empty() {
                    entry["values"] = json!(attr.values);
                }
                if !attr.validators.is_empty() {
                    entry["validators"] = Json::Array(
                        attr.validators
                            .iter()
                            .map(|v| Json::String(v.describe()))
                            .collect(),
                    );
                }
                (name.clone(), entry)
            })
            .collect();

        let rules: Vec<Json> = self
            .config_validators
            .iter()
            .map(|rule| match rule {
                ConfigValidator::ExactlyOneOf(names) => json!({ "exactly_one_of": names }),
            })
            .collect();

        json!({
            "description": self.description,
            "attributes": attributes,
            "config_validators": rules,
        })
    }
}
