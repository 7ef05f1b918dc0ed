//! Nested objects shared by several entities

use super::{computed_int, computed_set, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::{AccessEntry, AllowedPipeline, ResourcePermissions};
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

/// Access levels for pipelines
pub const PIPELINE_ACCESS_LEVELS: &[&str] = &["DENIED", "READ_ONLY", "RUN_ONLY", "READ_WRITE", "MANAGE", "DEFAULT"];
/// Access levels for repositories
pub const REPOSITORY_ACCESS_LEVELS: &[&str] = &["DENIED", "READ_ONLY", "READ_WRITE", "MANAGE"];
/// Access levels for the project team
pub const PROJECT_TEAM_ACCESS_LEVELS: &[&str] = &["READ_ONLY", "MANAGE"];
/// Access levels for sandboxes
pub const SANDBOX_ACCESS_LEVELS: &[&str] = &["DENIED", "READ_ONLY", "READ_WRITE"];
/// Access levels for targets and environments
pub const TARGET_ACCESS_LEVELS: &[&str] = &["DENIED", "USE_ONLY", "MANAGE", "DEFAULT"];
/// Access levels for integrations
pub const INTEGRATION_ACCESS_LEVELS: &[&str] = &["DENIED", "USE_ONLY", "MANAGE"];

/// `others` substituted when the API leaves it empty, per resource family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionFamily {
    Integration,
    Pipeline,
    Environment,
    Target,
}

impl PermissionFamily {
    pub fn default_others(self) -> &'static str {
        match self {
            PermissionFamily::Integration => "DENIED",
            PermissionFamily::Pipeline => "DEFAULT",
            PermissionFamily::Environment | PermissionFamily::Target => "USE_ONLY",
        }
    }

    pub fn access_levels(self) -> &'static [&'static str] {
        match self {
            PermissionFamily::Integration => INTEGRATION_ACCESS_LEVELS,
            PermissionFamily::Pipeline => PIPELINE_ACCESS_LEVELS,
            PermissionFamily::Environment | PermissionFamily::Target => TARGET_ACCESS_LEVELS,
        }
    }
}

/// Access granted to a single user or group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccessEntryFields {
    pub id: Value<i64>,
    pub access_level: Value<String>,
}

impl AccessEntryFields {
    pub fn load(dto: &AccessEntry) -> Self {
        Self {
            id: bridge::int64(dto.id),
            access_level: bridge::string(&dto.access_level),
        }
    }
}

impl Fields for AccessEntryFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("id", computed_int("The user or group ID")),
            ("access_level", computed_string("The access level granted")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            id: r.int64("id"),
            access_level: r.string("access_level"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("id", &self.id)
            .string("access_level", &self.access_level)
    }
}

nested_object!(AccessEntryFields);

/// Per-resource access control
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PermissionsFields {
    pub others: Value<String>,
    pub users: Value<Vec<AccessEntryFields>>,
    pub groups: Value<Vec<AccessEntryFields>>,
}

impl PermissionsFields {
    pub fn load(dto: &ResourcePermissions, family: PermissionFamily) -> Self {
        Self {
            others: bridge::string_or(&dto.others, family.default_others()),
            users: bridge::object_set(&dto.users, AccessEntryFields::load),
            groups: bridge::object_set(&dto.groups, AccessEntryFields::load),
        }
    }

    /// Absent permissions stay null
    pub fn load_opt(dto: Option<&ResourcePermissions>, family: PermissionFamily) -> Value<Self> {
        bridge::opt_object(dto, |p| Self::load(p, family))
    }
}

impl Fields for PermissionsFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("others", computed_string("Access level for users and groups not listed")),
            ("users", computed_set::<AccessEntryFields>("Access granted to individual users")),
            ("groups", computed_set::<AccessEntryFields>("Access granted to groups")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            others: r.string("others"),
            users: r.set("users"),
            groups: r.set("groups"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("others", &self.others)
            .set("users", &self.users)
            .set("groups", &self.groups)
    }
}

nested_object!(PermissionsFields);

/// A pipeline allowed to use a resource
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllowedPipelineFields {
    pub project: Value<String>,
    pub pipeline: Value<String>,
}

impl AllowedPipelineFields {
    pub fn load(dto: &AllowedPipeline) -> Self {
        Self {
            project: bridge::string(&dto.project),
            pipeline: bridge::string(&dto.pipeline),
        }
    }
}

impl Fields for AllowedPipelineFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("project", computed_string("Project name")),
            ("pipeline", computed_string("Pipeline identifier")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            project: r.string("project"),
            pipeline: r.string("pipeline"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("project", &self.project)
            .string("pipeline", &self.pipeline)
    }
}

nested_object!(AllowedPipelineFields);
