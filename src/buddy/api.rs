//! Remote API surface
//!
//! The data sources only ever talk to Buddy through this trait. The
//! production implementation is [`super::client::BuddyClient`]; tests
//! substitute an in-memory fake.
//!
//! List methods return every item across pages, in remote order.

use super::error::ApiError;
use super::models::{
    Environment, Group, Integration, Member, Permission, Pipeline, Profile, Project, Sandbox, Target,
    Variable, Webhook, Workspace,
};
use super::query::{ProjectQuery, SandboxQuery, TargetQuery, VariableQuery};
use async_trait::async_trait;

#[async_trait]
pub trait BuddyApi: Send + Sync {
    async fn get_workspace(&self, domain: &str) -> Result<Workspace, ApiError>;
    async fn get_workspaces(&self) -> Result<Vec<Workspace>, ApiError>;

    async fn get_project(&self, domain: &str, name: &str) -> Result<Project, ApiError>;
    async fn get_projects(&self, domain: &str, query: &ProjectQuery) -> Result<Vec<Project>, ApiError>;

    async fn get_group(&self, domain: &str, group_id: i64) -> Result<Group, ApiError>;
    async fn get_groups(&self, domain: &str) -> Result<Vec<Group>, ApiError>;
    async fn get_group_members(&self, domain: &str, group_id: i64) -> Result<Vec<Member>, ApiError>;

    async fn get_member(&self, domain: &str, member_id: i64) -> Result<Member, ApiError>;
    async fn get_members(&self, domain: &str) -> Result<Vec<Member>, ApiError>;

    async fn get_permission(&self, domain: &str, permission_id: i64) -> Result<Permission, ApiError>;
    async fn get_permissions(&self, domain: &str) -> Result<Vec<Permission>, ApiError>;

    async fn get_project_member(&self, domain: &str, project_name: &str, member_id: i64) -> Result<Member, ApiError>;
    async fn get_project_members(&self, domain: &str, project_name: &str) -> Result<Vec<Member>, ApiError>;

    async fn get_project_group(&self, domain: &str, project_name: &str, group_id: i64) -> Result<Group, ApiError>;
    async fn get_project_groups(&self, domain: &str, project_name: &str) -> Result<Vec<Group>, ApiError>;

    async fn get_integration(&self, domain: &str, hash_id: &str) -> Result<Integration, ApiError>;
    async fn get_integrations(&self, domain: &str) -> Result<Vec<Integration>, ApiError>;

    async fn get_pipeline(&self, domain: &str, project_name: &str, pipeline_id: i64) -> Result<Pipeline, ApiError>;
    async fn get_pipelines(&self, domain: &str, project_name: &str) -> Result<Vec<Pipeline>, ApiError>;

    async fn get_environment(&self, domain: &str, project_name: &str, environment_id: &str) -> Result<Environment, ApiError>;
    async fn get_environments(&self, domain: &str, project_name: &str) -> Result<Vec<Environment>, ApiError>;

    async fn get_sandbox(&self, domain: &str, sandbox_id: &str) -> Result<Sandbox, ApiError>;
    async fn get_sandboxes(&self, domain: &str, query: &SandboxQuery) -> Result<Vec<Sandbox>, ApiError>;

    async fn get_target(&self, domain: &str, target_id: &str) -> Result<Target, ApiError>;
    async fn get_targets(&self, domain: &str, query: &TargetQuery) -> Result<Vec<Target>, ApiError>;

    async fn get_variable(&self, domain: &str, variable_id: i64) -> Result<Variable, ApiError>;
    async fn get_variables(&self, domain: &str, query: &VariableQuery) -> Result<Vec<Variable>, ApiError>;

    async fn get_webhook(&self, domain: &str, webhook_id: i64) -> Result<Webhook, ApiError>;
    async fn get_webhooks(&self, domain: &str) -> Result<Vec<Webhook>, ApiError>;

    /// The authenticated member
    async fn get_profile(&self) -> Result<Profile, ApiError>;
}
