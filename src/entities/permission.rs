use super::common::{
    PIPELINE_ACCESS_LEVELS, PROJECT_TEAM_ACCESS_LEVELS, REPOSITORY_ACCESS_LEVELS, SANDBOX_ACCESS_LEVELS,
    TARGET_ACCESS_LEVELS,
};
use super::{computed_int, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Permission;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

pub const PERMISSION_TYPES: &[&str] = &["CUSTOM", "READ_ONLY", "DEVELOPER", "PROJECT_MANAGER"];

/// A workspace permission set (role)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PermissionFields {
    pub permission_id: Value<i64>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub kind: Value<String>,
    pub html_url: Value<String>,
    pub pipeline_access_level: Value<String>,
    pub repository_access_level: Value<String>,
    pub project_team_access_level: Value<String>,
    pub sandbox_access_level: Value<String>,
    pub target_access_level: Value<String>,
    pub environment_access_level: Value<String>,
}

impl PermissionFields {
    pub fn load(dto: &Permission) -> Self {
        Self {
            permission_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            description: bridge::string(&dto.description),
            kind: bridge::string(&dto.kind),
            html_url: bridge::string(&dto.html_url),
            pipeline_access_level: bridge::string(&dto.pipeline_access_level),
            repository_access_level: bridge::string(&dto.repository_access_level),
            project_team_access_level: bridge::string(&dto.project_team_access_level),
            sandbox_access_level: bridge::string(&dto.sandbox_access_level),
            target_access_level: bridge::opt_string(dto.target_access_level.as_deref()),
            environment_access_level: bridge::opt_string(dto.environment_access_level.as_deref()),
        }
    }
}

impl Fields for PermissionFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("permission_id", computed_int("The permission's ID")),
            ("name", computed_string("The permission's name")),
            ("description", computed_string("The permission's description")),
            ("type", computed_string("The permission's type").values(PERMISSION_TYPES)),
            ("html_url", computed_string("The permission's URL")),
            ("pipeline_access_level", computed_string("Access level for pipelines").values(PIPELINE_ACCESS_LEVELS)),
            ("repository_access_level", computed_string("Access level for the repository").values(REPOSITORY_ACCESS_LEVELS)),
            ("project_team_access_level", computed_string("Access level for the project team").values(PROJECT_TEAM_ACCESS_LEVELS)),
            ("sandbox_access_level", computed_string("Access level for sandboxes").values(SANDBOX_ACCESS_LEVELS)),
            ("target_access_level", computed_string("Access level for targets").values(TARGET_ACCESS_LEVELS)),
            ("environment_access_level", computed_string("Access level for environments").values(TARGET_ACCESS_LEVELS)),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            permission_id: r.int64("permission_id"),
            name: r.string("name"),
            description: r.string("description"),
            kind: r.string("type"),
            html_url: r.string("html_url"),
            pipeline_access_level: r.string("pipeline_access_level"),
            repository_access_level: r.string("repository_access_level"),
            project_team_access_level: r.string("project_team_access_level"),
            sandbox_access_level: r.string("sandbox_access_level"),
            target_access_level: r.string("target_access_level"),
            environment_access_level: r.string("environment_access_level"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("permission_id", &self.permission_id)
            .string("name", &self.name)
            .string("description", &self.description)
            .string("type", &self.kind)
            .string("html_url", &self.html_url)
            .string("pipeline_access_level", &self.pipeline_access_level)
            .string("repository_access_level", &self.repository_access_level)
            .string("project_team_access_level", &self.project_team_access_level)
            .string("sandbox_access_level", &self.sandbox_access_level)
            .string("target_access_level", &self.target_access_level)
            .string("environment_access_level", &self.environment_access_level)
    }
}

nested_object!(PermissionFields);
