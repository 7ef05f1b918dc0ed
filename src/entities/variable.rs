//! Variables
//!
//! The API returns plain variables and SSH keys from the same endpoints,
//! told apart by `type`. The discriminator is checked before any other
//! field is read: a record of the wrong kind is "not found", never a
//! partially filled record.

use super::{computed_bool, computed_int, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::{Variable, VARIABLE_TYPE_SSH_KEY, VARIABLE_TYPE_VAR};
use crate::buddy::query::VariableQuery;
use crate::errors;
use crate::framework::{AttrType, Attribute, Diagnostic, ObjectBuilder, ObjectReader, Value};

pub const VARIABLE_TYPES: &[&str] = &[VARIABLE_TYPE_VAR, VARIABLE_TYPE_SSH_KEY];

/// Which variant a data source reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    SshKey,
}

impl VariableKind {
    pub fn wire(self) -> &'static str {
        match self {
            VariableKind::Var => VARIABLE_TYPE_VAR,
            VariableKind::SshKey => VARIABLE_TYPE_SSH_KEY,
        }
    }

    /// Entity name used in not-found diagnostics
    pub fn entity(self) -> &'static str {
        match self {
            VariableKind::Var => "variable",
            VariableKind::SshKey => "variable ssh key",
        }
    }

    pub fn matches(self, dto: &Variable) -> bool {
        dto.kind == self.wire()
    }
}

/// Attributes common to both variants
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableFields {
    pub variable_id: Value<i64>,
    pub key: Value<String>,
    pub value: Value<String>,
    pub kind: Value<String>,
    pub description: Value<String>,
    pub settable: Value<bool>,
    pub encrypted: Value<bool>,
}

impl VariableFields {
    /// Load a variable of the expected kind
    pub fn load(dto: &Variable, kind: VariableKind) -> Result<Self, Diagnostic> {
        if !kind.matches(dto) {
            tracing::debug!(variable_id = dto.id, found = %dto.kind, expected = kind.wire(), "variable type mismatch");
            return Err(errors::not_found(kind.entity()));
        }
        Ok(Self {
            variable_id: bridge::int64(dto.id),
            key: bridge::string(&dto.key),
            value: bridge::string(&dto.value),
            kind: bridge::string(&dto.kind),
            description: bridge::string(&dto.description),
            settable: bridge::boolean(dto.settable),
            // SSH keys are always stored encrypted
            encrypted: bridge::boolean(dto.encrypted || kind == VariableKind::SshKey),
        })
    }
}

impl Fields for VariableFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("variable_id", computed_int("The variable's ID")),
            ("key", computed_string("The variable's key")),
            ("value", computed_string("The variable's value, encrypted when the variable is").sensitive()),
            ("type", computed_string("The variable's type: VAR or SSH_KEY")),
            ("description", computed_string("The variable's description")),
            ("settable", computed_bool("Whether the value may be changed by a pipeline run")),
            ("encrypted", computed_bool("Whether the value is encrypted")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            variable_id: r.int64("variable_id"),
            key: r.string("key"),
            value: r.string("value"),
            kind: r.string("type"),
            description: r.string("description"),
            settable: r.bool("settable"),
            encrypted: r.bool("encrypted"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("variable_id", &self.variable_id)
            .string("key", &self.key)
            .string("value", &self.value)
            .string("type", &self.kind)
            .string("description", &self.description)
            .bool("settable", &self.settable)
            .bool("encrypted", &self.encrypted)
    }
}

/// Attributes only SSH keys carry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SshKeyFields {
    pub file_place: Value<String>,
    pub file_path: Value<String>,
    pub file_chmod: Value<String>,
    pub checksum: Value<String>,
    pub key_fingerprint: Value<String>,
    pub public_value: Value<String>,
}

impl SshKeyFields {
    pub fn load(dto: &Variable) -> Self {
        Self {
            file_place: bridge::string(&dto.file_place),
            file_path: bridge::string(&dto.file_path),
            file_chmod: bridge::string(&dto.file_chmod),
            checksum: bridge::string(&dto.checksum),
            key_fingerprint: bridge::string(&dto.key_fingerprint),
            public_value: bridge::string(&dto.public_value),
        }
    }
}

impl Fields for SshKeyFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("file_place", computed_string("Where the key is placed: NONE or CONTAINER")),
            ("file_path", computed_string("Path of the key file in the container")),
            ("file_chmod", computed_string("Permissions of the key file")),
            ("checksum", computed_string("Checksum of the key")),
            ("key_fingerprint", computed_string("Fingerprint of the key")),
            ("public_value", computed_string("Public part of the key")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            file_place: r.string("file_place"),
            file_path: r.string("file_path"),
            file_chmod: r.string("file_chmod"),
            checksum: r.string("checksum"),
            key_fingerprint: r.string("key_fingerprint"),
            public_value: r.string("public_value"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("file_place", &self.file_place)
            .string("file_path", &self.file_path)
            .string("file_chmod", &self.file_chmod)
            .string("checksum", &self.checksum)
            .string("key_fingerprint", &self.key_fingerprint)
            .string("public_value", &self.public_value)
    }
}

/// Where a variable is defined; all null means workspace level
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableScope {
    pub project_name: Value<String>,
    pub pipeline_id: Value<i64>,
    pub action_id: Value<i64>,
    pub environment_id: Value<String>,
}

impl VariableScope {
    /// Configurable and filled in by the read
    pub fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            (
                "project_name",
                Attribute::optional_computed(AttrType::String).describe("Project the variable is defined in"),
            ),
            (
                "pipeline_id",
                Attribute::optional_computed(AttrType::Int64).describe("Pipeline the variable is defined in"),
            ),
            (
                "action_id",
                Attribute::optional_computed(AttrType::Int64).describe("Action the variable is defined in"),
            ),
            (
                "environment_id",
                Attribute::optional_computed(AttrType::String).describe("Environment the variable is defined in"),
            ),
        ]
    }

    pub fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            project_name: r.string("project_name"),
            pipeline_id: r.int64("pipeline_id"),
            action_id: r.int64("action_id"),
            environment_id: r.string("environment_id"),
        }
    }

    pub fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("project_name", &self.project_name)
            .int64("pipeline_id", &self.pipeline_id)
            .int64("action_id", &self.action_id)
            .string("environment_id", &self.environment_id)
    }

    /// List options for the known parts of the scope
    pub fn query(&self) -> VariableQuery {
        VariableQuery {
            project_name: self.project_name.as_known().cloned(),
            pipeline_id: self.pipeline_id.get(),
            action_id: self.action_id.get(),
            environment_id: self.environment_id.as_known().cloned(),
        }
    }

    /// Scope of a fetched variable: the DTO's nested scope first, then
    /// the scope the caller asked for, then null
    pub fn resolve(dto: &Variable, requested: &VariableScope) -> Self {
        Self {
            project_name: bridge::opt_string(dto.project.as_ref().map(|p| p.name.as_str()))
                .or(requested.project_name.clone()),
            pipeline_id: bridge::opt_int64(dto.pipeline.as_ref().map(|p| p.id))
                .or(requested.pipeline_id.clone()),
            action_id: bridge::opt_int64(dto.action.as_ref().map(|a| a.id))
                .or(requested.action_id.clone()),
            environment_id: bridge::opt_string(dto.environment.as_ref().map(|e| e.id.as_str()))
                .or(requested.environment_id.clone()),
        }
    }
}
