//! Host framework model
//!
//! The declarative tool's plugin surface, reduced to what a read-only
//! data source needs: typed tri-state values, schemas with validators,
//! diagnostics, and the read callback.
//!
//! # Module Structure
//!
//! - [`value`] - Tri-state values and the dynamic state tree
//! - [`schema`] - Attribute schemas and configuration validation
//! - [`diag`] - Diagnostics and attribute paths
//! - [`record`] - Typed records over state objects
//! - [`datasource`] - The data-source interface and the generic read shell

pub mod datasource;
pub mod diag;
pub mod record;
pub mod schema;
pub mod value;

pub use datasource::{DataSource, ReadContext, ReadResponse, ReadSpec, Shell};
pub use diag::{AttrPath, Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use record::{NestedObject, ObjectBuilder, ObjectReader, Record};
pub use schema::{Attribute, ConfigValidator, Mode, Schema};
pub use value::{AttrType, Primitive, StateValue, Value};
