//! Shared helpers for integration tests
//!
//! [`FakeApi`] is an in-memory [`BuddyApi`] that records every call, so
//! tests can assert both the state produced and the remote traffic.

#![allow(dead_code)]

use async_trait::async_trait;
use buddy_datasources::buddy::models::{
    Environment, Group, Integration, Member, Permission, Pipeline, Profile, Project, Sandbox, Target,
    Variable, Webhook, Workspace,
};
use buddy_datasources::buddy::query::{ProjectQuery, SandboxQuery, TargetQuery, VariableQuery};
use buddy_datasources::buddy::{ApiError, BuddyApi};
use buddy_datasources::framework::{AttrPath, DataSource, StateValue};
use buddy_datasources::Provider;
use serde_json::Value as Json;
use std::sync::{Arc, Mutex};

/// In-memory Buddy workspace
#[derive(Default)]
pub struct FakeApi {
    pub workspaces: Vec<Workspace>,
    pub projects: Vec<Project>,
    pub groups: Vec<Group>,
    pub members: Vec<Member>,
    pub permissions: Vec<Permission>,
    pub integrations: Vec<Integration>,
    pub pipelines: Vec<Pipeline>,
    pub environments: Vec<Environment>,
    pub sandboxes: Vec<Sandbox>,
    pub targets: Vec<Target>,
    pub variables: Vec<Variable>,
    pub webhooks: Vec<Webhook>,
    pub profile: Option<Profile>,
    pub calls: Mutex<Vec<String>>,
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "Not found".to_string(),
    }
}

fn find<T: Clone>(items: &[T], pred: impl Fn(&T) -> bool) -> Result<T, ApiError> {
    items.iter().find(|item| pred(item)).cloned().ok_or_else(not_found)
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BuddyApi for FakeApi {
    async fn get_workspace(&self, domain: &str) -> Result<Workspace, ApiError> {
        self.record(format!("get_workspace {}", domain));
        find(&self.workspaces, |w| w.domain == domain)
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        self.record("get_workspaces".to_string());
        Ok(self.workspaces.clone())
    }

    async fn get_project(&self, domain: &str, name: &str) -> Result<Project, ApiError> {
        self.record(format!("get_project {} {}", domain, name));
        find(&self.projects, |p| p.name == name)
    }

    async fn get_projects(&self, domain: &str, query: &ProjectQuery) -> Result<Vec<Project>, ApiError> {
        self.record(format!("get_projects {} {:?}", domain, query.params()));
        Ok(self.projects.clone())
    }

    async fn get_group(&self, domain: &str, group_id: i64) -> Result<Group, ApiError> {
        self.record(format!("get_group {} {}", domain, group_id));
        find(&self.groups, |g| g.id == group_id)
    }

    async fn get_groups(&self, domain: &str) -> Result<Vec<Group>, ApiError> {
        self.record(format!("get_groups {}", domain));
        Ok(self.groups.clone())
    }

    async fn get_group_members(&self, domain: &str, group_id: i64) -> Result<Vec<Member>, ApiError> {
        self.record(format!("get_group_members {} {}", domain, group_id));
        Ok(self.members.clone())
    }

    async fn get_member(&self, domain: &str, member_id: i64) -> Result<Member, ApiError> {
        self.record(format!("get_member {} {}", domain, member_id));
        find(&self.members, |m| m.id == member_id)
    }

    async fn get_members(&self, domain: &str) -> Result<Vec<Member>, ApiError> {
        self.record(format!("get_members {}", domain));
        Ok(self.members.clone())
    }

    async fn get_permission(&self, domain: &str, permission_id: i64) -> Result<Permission, ApiError> {
        self.record(format!("get_permission {} {}", domain, permission_id));
        find(&self.permissions, |p| p.id == permission_id)
    }

    async fn get_permissions(&self, domain: &str) -> Result<Vec<Permission>, ApiError> {
        self.record(format!("get_permissions {}", domain));
        Ok(self.permissions.clone())
    }

    async fn get_project_member(&self, domain: &str, project_name: &str, member_id: i64) -> Result<Member, ApiError> {
        self.record(format!("get_project_member {} {} {}", domain, project_name, member_id));
        find(&self.members, |m| m.id == member_id)
    }

    async fn get_project_members(&self, domain: &str, project_name: &str) -> Result<Vec<Member>, ApiError> {
        self.record(format!("get_project_members {} {}", domain, project_name));
        Ok(self.members.clone())
    }

    async fn get_project_group(&self, domain: &str, project_name: &str, group_id: i64) -> Result<Group, ApiError> {
        self.record(format!("get_project_group {} {} {}", domain, project_name, group_id));
        find(&self.groups, |g| g.id == group_id)
    }

    async fn get_project_groups(&self, domain: &str, project_name: &str) -> Result<Vec<Group>, ApiError> {
        self.record(format!("get_project_groups {} {}", domain, project_name));
        Ok(self.groups.clone())
    }

    async fn get_integration(&self, domain: &str, hash_id: &str) -> Result<Integration, ApiError> {
        self.record(format!("get_integration {} {}", domain, hash_id));
        find(&self.integrations, |i| i.hash_id == hash_id)
    }

    async fn get_integrations(&self, domain: &str) -> Result<Vec<Integration>, ApiError> {
        self.record(format!("get_integrations {}", domain));
        Ok(self.integrations.clone())
    }

    async fn get_pipeline(&self, domain: &str, project_name: &str, pipeline_id: i64) -> Result<Pipeline, ApiError> {
        self.record(format!("get_pipeline {} {} {}", domain, project_name, pipeline_id));
        find(&self.pipelines, |p| p.id == pipeline_id)
    }

    async fn get_pipelines(&self, domain: &str, project_name: &str) -> Result<Vec<Pipeline>, ApiError> {
        self.record(format!("get_pipelines {} {}", domain, project_name));
        Ok(self.pipelines.clone())
    }

    async fn get_environment(&self, domain: &str, project_name: &str, environment_id: &str) -> Result<Environment, ApiError> {
        self.record(format!("get_environment {} {} {}", domain, project_name, environment_id));
        find(&self.environments, |e| e.id == environment_id)
    }

    async fn get_environments(&self, domain: &str, project_name: &str) -> Result<Vec<Environment>, ApiError> {
        self.record(format!("get_environments {} {}", domain, project_name));
        Ok(self.environments.clone())
    }

    async fn get_sandbox(&self, domain: &str, sandbox_id: &str) -> Result<Sandbox, ApiError> {
        self.record(format!("get_sandbox {} {}", domain, sandbox_id));
        find(&self.sandboxes, |s| s.id == sandbox_id)
    }

    async fn get_sandboxes(&self, domain: &str, query: &SandboxQuery) -> Result<Vec<Sandbox>, ApiError> {
        self.record(format!("get_sandboxes {} {:?}", domain, query.params()));
        Ok(self.sandboxes.clone())
    }

    async fn get_target(&self, domain: &str, target_id: &str) -> Result<Target, ApiError> {
        self.record(format!("get_target {} {}", domain, target_id));
        find(&self.targets, |t| t.id == target_id)
    }

    async fn get_targets(&self, domain: &str, query: &TargetQuery) -> Result<Vec<Target>, ApiError> {
        self.record(format!("get_targets {} {:?}", domain, query.params()));
        Ok(self.targets.clone())
    }

    async fn get_variable(&self, domain: &str, variable_id: i64) -> Result<Variable, ApiError> {
        self.record(format!("get_variable {} {}", domain, variable_id));
        find(&self.variables, |v| v.id == variable_id)
    }

    async fn get_variables(&self, domain: &str, query: &VariableQuery) -> Result<Vec<Variable>, ApiError> {
        self.record(format!("get_variables {} {:?}", domain, query.params()));
        Ok(self.variables.clone())
    }

    async fn get_webhook(&self, domain: &str, webhook_id: i64) -> Result<Webhook, ApiError> {
        self.record(format!("get_webhook {} {}", domain, webhook_id));
        find(&self.webhooks, |w| w.id == webhook_id)
    }

    async fn get_webhooks(&self, domain: &str) -> Result<Vec<Webhook>, ApiError> {
        self.record(format!("get_webhooks {}", domain));
        Ok(self.webhooks.clone())
    }

    async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.record("get_profile".to_string());
        self.profile.clone().ok_or_else(not_found)
    }
}

/// Provider over a fake, keeping a handle on the fake for call assertions
pub fn provider(api: FakeApi) -> (Provider, Arc<FakeApi>) {
    let api = Arc::new(api);
    (Provider::new(api.clone()), api)
}

/// Decode a JSON configuration against a data source's schema
pub fn config(ds: &dyn DataSource, json: Json) -> StateValue {
    StateValue::from_json(&ds.schema().object_type(), &json, &AttrPath::default()).expect("valid configuration JSON")
}

pub fn str_attr<'a>(state: &'a StateValue, name: &str) -> Option<&'a str> {
    state.get(name).and_then(StateValue::as_str)
}

pub fn set_attr<'a>(state: &'a StateValue, name: &str) -> &'a [StateValue] {
    state.get(name).and_then(StateValue::as_set).unwrap_or(&[])
}
