//! Buddy API data-transfer objects
//!
//! Field names follow the JSON the API returns. Every struct tolerates
//! missing fields: absent strings decode as empty, absent lists as empty,
//! and fields the API may omit entirely are `Option`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub name: String,
    pub domain: String,
    pub owner_id: i64,
    pub frozen: bool,
    pub create_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub url: String,
    pub html_url: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub create_date: String,
    pub access: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pipeline_access_level: String,
    pub repository_access_level: String,
    pub project_team_access_level: String,
    pub sandbox_access_level: String,
    pub target_access_level: Option<String>,
    pub environment_access_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub name: String,
    pub description: String,
    pub auto_assign_to_new_projects: bool,
    pub auto_assign_permission_set_id: Option<i64>,
    /// Present on project-scoped group listings
    pub permission_set: Option<Permission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub admin: bool,
    pub workspace_owner: bool,
    pub auto_assign_to_new_projects: bool,
    pub auto_assign_permission_set_id: Option<i64>,
    /// Present on project-scoped member listings
    pub permission_set: Option<Permission>,
}

/// Access granted to one user or group on a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessEntry {
    pub id: i64,
    pub access_level: String,
}

/// Per-resource access control
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePermissions {
    pub others: String,
    pub users: Vec<AccessEntry>,
    pub groups: Vec<AccessEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedPipeline {
    pub project: String,
    pub pipeline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integration {
    pub url: String,
    pub html_url: String,
    pub hash_id: String,
    pub name: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scope: String,
    pub project_name: Option<String>,
    pub all_pipelines_allowed: bool,
    pub allowed_pipelines: Vec<AllowedPipeline>,
    pub permissions: Option<ResourcePermissions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub refs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteParameter {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub project: String,
    pub branch: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub name: String,
    pub identifier: String,
    pub on: String,
    pub refs: Vec<String>,
    pub tags: Vec<String>,
    pub events: Vec<PipelineEvent>,
    pub priority: String,
    pub cpu: String,
    pub disabled: bool,
    pub disabling_reason: String,
    pub last_execution_status: String,
    pub last_execution_revision: String,
    pub create_date: String,
    pub always_from_scratch: bool,
    pub auto_clear_cache: bool,
    pub no_skip_to_most_recent: bool,
    pub do_not_create_commit_status: bool,
    pub fail_on_prepare_env_warning: bool,
    pub fetch_all_refs: bool,
    pub ignore_fail_on_project_status: bool,
    pub paused: bool,
    pub concurrent_pipeline_runs: bool,
    pub clone_depth: i64,
    pub worker: String,
    pub folder: String,
    pub description: String,
    pub execution_message_template: String,
    pub target_site_url: String,
    pub git_changeset_base: String,
    pub filesystem_changeset_base: String,
    pub definition_source: String,
    pub remote_project_name: String,
    pub remote_branch: String,
    pub remote_path: String,
    pub remote_parameters: Vec<RemoteParameter>,
    pub git_config_ref: String,
    pub git_config: Option<GitConfig>,
    pub permissions: Option<ResourcePermissions>,
}

/// Reference to a project by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRef {
    pub name: String,
    pub display_name: String,
}

/// Reference to a numeric entity such as a pipeline or action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdRef {
    pub id: i64,
    pub name: String,
}

/// Reference to an environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub url: String,
    pub html_url: String,
    pub id: String,
    pub name: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub scope: String,
    pub public_url: String,
    pub tags: Vec<String>,
    pub all_pipelines_allowed: bool,
    pub allowed_pipelines: Vec<AllowedPipeline>,
    pub project: Option<ProjectRef>,
    pub permissions: Option<ResourcePermissions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxEndpoint {
    pub name: String,
    pub endpoint: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sandbox {
    pub url: String,
    pub html_url: String,
    pub id: String,
    pub name: String,
    pub identifier: String,
    pub status: String,
    pub setup_status: String,
    pub app_status: String,
    pub os: String,
    pub resources: String,
    pub app_dir: String,
    pub app_type: String,
    pub run_command: String,
    pub install_commands: String,
    pub tags: Vec<String>,
    pub endpoints: Vec<SandboxEndpoint>,
    pub project: Option<ProjectRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetAuth {
    pub method: String,
    pub username: String,
    pub asset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProxy {
    pub name: String,
    pub host: String,
    pub port: String,
    pub auth: Option<TargetAuth>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub url: String,
    pub html_url: String,
    pub id: String,
    pub name: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub host: String,
    pub port: String,
    pub path: String,
    pub secure: bool,
    pub disabled: bool,
    pub tags: Vec<String>,
    pub auth: Option<TargetAuth>,
    pub proxy: Option<TargetProxy>,
    pub all_pipelines_allowed: bool,
    pub allowed_pipelines: Vec<AllowedPipeline>,
    pub permissions: Option<ResourcePermissions>,
    pub project: Option<ProjectRef>,
    pub pipeline: Option<IdRef>,
    pub environment: Option<EnvironmentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    pub url: String,
    pub id: i64,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub settable: bool,
    pub encrypted: bool,
    pub file_place: String,
    pub file_path: String,
    pub file_chmod: String,
    pub checksum: String,
    pub key_fingerprint: String,
    pub public_value: String,
    pub project: Option<ProjectRef>,
    pub pipeline: Option<IdRef>,
    pub action: Option<IdRef>,
    pub environment: Option<EnvironmentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub target_url: String,
    pub secret_key: String,
    pub events: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub url: String,
    pub html_url: String,
    pub id: i64,
    pub name: String,
    pub avatar_url: String,
    pub title: String,
}

/// Variable discriminator values
pub const VARIABLE_TYPE_VAR: &str = "VAR";
pub const VARIABLE_TYPE_SSH_KEY: &str = "SSH_KEY";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_decode_as_defaults() {
        let project: Project = serde_json::from_value(json!({"name": "web"})).unwrap();
        assert_eq!(project.name, "web");
        assert_eq!(project.display_name, "");
    }

    #[test]
    fn test_type_field_is_renamed() {
        let variable: Variable = serde_json::from_value(json!({
            "id": 7,
            "key": "deploy",
            "type": "SSH_KEY",
            "project": {"name": "web"}
        }))
        .unwrap();
        assert_eq!(variable.kind, VARIABLE_TYPE_SSH_KEY);
        assert_eq!(variable.project.unwrap().name, "web");
        assert!(variable.pipeline.is_none());
    }

    #[test]
    fn test_optional_nested_objects() {
        let pipeline: Pipeline = serde_json::from_value(json!({
            "id": 1,
            "name": "deploy",
            "git_config": {"project": "infra", "branch": "main", "path": "buddy.yml"}
        }))
        .unwrap();
        assert_eq!(pipeline.git_config.unwrap().branch, "main");
        assert!(pipeline.permissions.is_none());
        assert!(pipeline.events.is_empty());
    }
}
