//! Entity mappers
//!
//! One module per Buddy entity. Each exposes a `*Fields` record holding
//! every attribute the remote entity fills in, with `load` converting a
//! DTO into the record. Single-entity data sources embed the record at
//! the top level of their state; list data sources emit a set of them.
//!
//! # Module Structure
//!
//! - [`common`] - Permissions, allowed pipelines and other shared nested objects
//! - [`workspace`], [`project`], [`group`], [`member`], [`permission`]
//! - [`integration`], [`pipeline`], [`environment`], [`sandbox`], [`target`]
//! - [`variable`], [`webhook`], [`profile`]

use crate::framework::{AttrType, Attribute, NestedObject, ObjectBuilder, ObjectReader};

/// Implements [`crate::framework::Record`] and [`NestedObject`] for a [`Fields`] type
macro_rules! nested_object {
    ($ty:ty) => {
        impl $crate::framework::Record for $ty {
            fn from_state(
                value: &$crate::framework::StateValue,
                path: &$crate::framework::AttrPath,
            ) -> Result<Self, $crate::framework::Diagnostics> {
                let mut reader = $crate::framework::ObjectReader::new(value, path)?;
                let record = <$ty as $crate::entities::Fields>::read(&mut reader);
                reader.finish(record)
            }

            fn to_state(
                &self,
                path: &$crate::framework::AttrPath,
            ) -> Result<$crate::framework::StateValue, $crate::framework::Diagnostics> {
                <$ty as $crate::entities::Fields>::write(self, $crate::framework::ObjectBuilder::new(path))
                    .finish_typed(&$crate::entities::object_type::<$ty>())
            }
        }

        impl $crate::framework::NestedObject for $ty {
            fn object_type() -> $crate::framework::AttrType {
                $crate::entities::object_type::<$ty>()
            }
        }
    };
}

pub mod common;
pub mod environment;
pub mod group;
pub mod integration;
pub mod member;
pub mod permission;
pub mod pipeline;
pub mod profile;
pub mod project;
pub mod sandbox;
pub mod target;
pub mod variable;
pub mod webhook;
pub mod workspace;

/// The attributes a remote entity fills in
pub trait Fields: Sized + Clone + PartialEq + Send + Sync {
    /// Declared attributes, all computed
    fn attributes() -> Vec<(&'static str, Attribute)>;

    /// Read the attributes out of a configuration or state object
    fn read(reader: &mut ObjectReader<'_>) -> Self;

    /// Write every declared attribute
    fn write(&self, builder: ObjectBuilder) -> ObjectBuilder;
}

/// Object type built from the declared attributes
pub fn object_type<F: Fields>() -> AttrType {
    AttrType::object(F::attributes().into_iter().map(|(name, attr)| (name, attr.ty)))
}

pub(crate) fn computed_string(description: &'static str) -> Attribute {
    Attribute::computed(AttrType::String).describe(description)
}

pub(crate) fn computed_int(description: &'static str) -> Attribute {
    Attribute::computed(AttrType::Int64).describe(description)
}

pub(crate) fn computed_bool(description: &'static str) -> Attribute {
    Attribute::computed(AttrType::Bool).describe(description)
}

pub(crate) fn computed_strings(description: &'static str) -> Attribute {
    Attribute::computed(AttrType::set(AttrType::String)).describe(description)
}

pub(crate) fn computed_object<N: NestedObject>(description: &'static str) -> Attribute {
    Attribute::computed(N::object_type()).describe(description)
}

pub(crate) fn computed_set<N: NestedObject>(description: &'static str) -> Attribute {
    Attribute::computed(AttrType::set(N::object_type())).describe(description)
}
