//! Read-side data sources for Buddy CI/CD workspaces.
//!
//! A declarative infrastructure host asks for a data source by type name
//! (`buddy_project`, `buddy_variable_ssh_key`, ...), hands over a
//! configuration object, and gets back a state object or diagnostics.
//!
//! # Module Structure
//!
//! - [`framework`] - Host plugin surface: tri-state values, schemas, diagnostics
//! - [`bridge`] - Conversions between remote values and framework values
//! - [`entities`] - Mappers from remote entities to attribute records
//! - [`filter`] - Selector resolution and list filtering
//! - [`ids`] - Composite identifiers
//! - [`validators`] - Attribute validators
//! - [`errors`] - Remote errors to diagnostics
//! - [`buddy`] - The Buddy REST client
//! - [`datasources`] - The data-source adapters
//! - [`provider`] - Registry of every data source
//! - [`config`] - Provider configuration

pub mod bridge;
pub mod buddy;
pub mod config;
pub mod datasources;
pub mod entities;
pub mod errors;
pub mod filter;
pub mod framework;
pub mod ids;
pub mod provider;
pub mod validators;

pub use provider::{Provider, ReadRequest};
