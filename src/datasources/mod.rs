//! Data-source adapters
//!
//! Each adapter is a [`ReadSpec`](crate::framework::ReadSpec): a type
//! name, a schema, a fetch through the selector and filter engine, and a
//! mapping through the entity mappers. The generic
//! [`Shell`](crate::framework::Shell) turns them into host data sources.
//!
//! # Module Structure
//!
//! One module per entity family, holding the single-entity adapter and
//! the list adapter(s) side by side.

use crate::framework::{AttrType, Attribute, Value};
use crate::ids;
use crate::validators::Validator;

pub mod environment;
pub mod group;
pub mod integration;
pub mod member;
pub mod permission;
pub mod pipeline;
pub mod profile;
pub mod project;
pub mod project_access;
pub mod sandbox;
pub mod target;
pub mod variable;
pub mod webhook;
pub mod workspace;

pub(crate) fn id_attribute() -> Attribute {
    Attribute::computed(AttrType::String).describe("The Terraform resource identifier for this item")
}

pub(crate) fn domain_attribute() -> Attribute {
    Attribute::required(AttrType::String)
        .describe("The workspace's URL handle")
        .validate(Validator::Domain)
}

pub(crate) fn project_name_attribute() -> Attribute {
    Attribute::required(AttrType::String)
        .describe("The project's name")
        .validate(Validator::Slug)
}

pub(crate) fn regex_attribute(description: &'static str) -> Attribute {
    Attribute::optional(AttrType::String)
        .describe(description)
        .validate(Validator::Regex)
}

/// Selector attribute: configurable, filled in by the read otherwise
pub(crate) fn selector(ty: AttrType, description: &'static str) -> Attribute {
    Attribute::optional_computed(ty).describe(description)
}

/// Numeric id selector; Buddy ids start at 1
pub(crate) fn id_selector(description: &'static str) -> Attribute {
    selector(AttrType::Int64, description).validate(Validator::AtLeast(1))
}

/// Synthetic id of a list data source
pub(crate) fn list_id() -> Value<String> {
    Value::Known(ids::unique_string())
}

/// `domain:key` once both parts are known
pub(crate) fn double_id(domain: &Value<String>, key: &str) -> Value<String> {
    domain.clone().map(|d| ids::compose_double(&d, key))
}

/// `domain:project:key` once both scope parts are known
pub(crate) fn triple_id(domain: &Value<String>, project: &Value<String>, key: &str) -> Value<String> {
    domain
        .clone()
        .zip(project.clone())
        .map(|(d, p)| ids::compose_triple(&d, &p, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composed_ids() {
        let domain: Value<String> = "acme".into();
        let project: Value<String> = "web".into();
        assert_eq!(double_id(&domain, "12").as_str(), Some("acme:12"));
        assert_eq!(triple_id(&domain, &project, "3").as_str(), Some("acme:web:3"));
        assert!(triple_id(&domain, &Value::Null, "3").is_null());
    }

    #[test]
    fn test_list_ids_are_fresh() {
        assert_ne!(list_id(), list_id());
    }
}
