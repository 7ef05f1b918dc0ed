//! Buddy Client
//!
//! Main client for interacting with the Buddy REST API, combining the
//! HTTP wrapper with URL building, paging and response decoding.

use super::api::BuddyApi;
use super::error::ApiError;
use super::http::{BuddyHttpClient, HttpOptions};
use super::models::{
    Environment, Group, Integration, Member, Permission, Pipeline, Profile, Project, Sandbox, Target,
    Variable, Webhook, Workspace,
};
use super::query::{ProjectQuery, SandboxQuery, TargetQuery, VariableQuery};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Items requested per page when exhausting a paged listing
pub const PAGE_SIZE: usize = 100;

/// Upper bound on pages fetched for one listing
pub const MAX_PAGES: usize = 500;

/// Main Buddy client
#[derive(Clone)]
pub struct BuddyClient {
    http: BuddyHttpClient,
    base_url: String,
    token: String,
}

impl BuddyClient {
    /// Create a new Buddy client
    pub fn new(base_url: &str, token: &str, options: &HttpOptions) -> Result<Self, ApiError> {
        let http = BuddyHttpClient::new(options)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an API URL from path segments, encoding each one
    fn url(&self, segments: &[&str]) -> String {
        let path: Vec<String> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/{}", self.base_url, path.join("/"))
    }

    /// Build a workspace-scoped URL
    pub fn workspace_url(&self, domain: &str, resource: &[&str]) -> String {
        let mut segments = vec!["workspaces", domain];
        segments.extend_from_slice(resource);
        self.url(&segments)
    }

    /// Build a project-scoped URL
    pub fn project_url(&self, domain: &str, project_name: &str, resource: &[&str]) -> String {
        let mut segments = vec!["projects", project_name];
        segments.extend_from_slice(resource);
        self.workspace_url(domain, &segments)
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    async fn get_one<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let mut response = self.http.get(url, &self.token, &[]).await?;
        strip_nulls(&mut response);
        serde_json::from_value(response).map_err(ApiError::from)
    }

    /// Fetch a single, unpaged listing
    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        response_path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let response = self.http.get(url, &self.token, query).await?;
        extract_items(response, response_path)
    }

    /// Fetch every page of a paged listing.
    ///
    /// Stops at the first short or empty page. A page identical to the
    /// one before it, or a listing longer than [`MAX_PAGES`], is an error.
    async fn get_list_all<T: DeserializeOwned>(
        &self,
        url: &str,
        response_path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let mut all_items = Vec::new();
        let mut previous: Vec<Value> = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut params: Vec<(&str, String)> = query.to_vec();
            params.push(("page", page.to_string()));
            params.push(("per_page", PAGE_SIZE.to_string()));

            let response = self.http.get(url, &self.token, &params).await?;
            let items = item_values(response, response_path)?;
            if items.is_empty() {
                tracing::debug!("fetched {} items from {}", all_items.len(), url);
                return Ok(all_items);
            }
            if page > 1 && items == previous {
                tracing::warn!("page {} of {} repeats the previous page", page, url);
                return Err(ApiError::Paging {
                    url: url.to_string(),
                    reason: format!("page {} repeats page {}", page, page - 1),
                });
            }

            all_items.extend(decode_items::<T>(&items)?);
            if items.len() < PAGE_SIZE {
                tracing::debug!("fetched {} items from {}", all_items.len(), url);
                return Ok(all_items);
            }
            previous = items;
        }

        tracing::warn!("{} still full after {} pages", url, MAX_PAGES);
        Err(ApiError::Paging {
            url: url.to_string(),
            reason: format!("more than {} pages", MAX_PAGES),
        })
    }
}

/// Drop `null` object members so absent and null fields both take defaults
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Raw item array found under `path` in a list response
fn item_values(mut response: Value, path: &str) -> Result<Vec<Value>, ApiError> {
    strip_nulls(&mut response);
    match response {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(path) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ApiError::Decode(format!(
                "expected \"{}\" to be an array, got {}",
                path, other
            ))),
            None => Ok(Vec::new()),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(ApiError::Decode(format!(
            "unexpected list response: {}",
            other
        ))),
    }
}

fn decode_items<T: DeserializeOwned>(items: &[Value]) -> Result<Vec<T>, ApiError> {
    items
        .iter()
        .map(|item| T::deserialize(item).map_err(ApiError::from))
        .collect()
}

/// Extract the item array found under `path` in a list response
fn extract_items<T: DeserializeOwned>(response: Value, path: &str) -> Result<Vec<T>, ApiError> {
    decode_items(&item_values(response, path)?)
}

#[async_trait]
impl BuddyApi for BuddyClient {
    async fn get_workspace(&self, domain: &str) -> Result<Workspace, ApiError> {
        self.get_one(&self.workspace_url(domain, &[])).await
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        self.get_list(&self.url(&["workspaces"]), "workspaces", &[]).await
    }

    async fn get_project(&self, domain: &str, name: &str) -> Result<Project, ApiError> {
        self.get_one(&self.project_url(domain, name, &[])).await
    }

    async fn get_projects(&self, domain: &str, query: &ProjectQuery) -> Result<Vec<Project>, ApiError> {
        self.get_list_all(&self.workspace_url(domain, &["projects"]), "projects", &query.params())
            .await
    }

    async fn get_group(&self, domain: &str, group_id: i64) -> Result<Group, ApiError> {
        self.get_one(&self.workspace_url(domain, &["groups", &group_id.to_string()]))
            .await
    }

    async fn get_groups(&self, domain: &str) -> Result<Vec<Group>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["groups"]), "groups", &[])
            .await
    }

    async fn get_group_members(&self, domain: &str, group_id: i64) -> Result<Vec<Member>, ApiError> {
        let url = self.workspace_url(domain, &["groups", &group_id.to_string(), "members"]);
        self.get_list(&url, "members", &[]).await
    }

    async fn get_member(&self, domain: &str, member_id: i64) -> Result<Member, ApiError> {
        self.get_one(&self.workspace_url(domain, &["members", &member_id.to_string()]))
            .await
    }

    async fn get_members(&self, domain: &str) -> Result<Vec<Member>, ApiError> {
        self.get_list_all(&self.workspace_url(domain, &["members"]), "members", &[])
            .await
    }

    async fn get_permission(&self, domain: &str, permission_id: i64) -> Result<Permission, ApiError> {
        self.get_one(&self.workspace_url(domain, &["permissions", &permission_id.to_string()]))
            .await
    }

    async fn get_permissions(&self, domain: &str) -> Result<Vec<Permission>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["permissions"]), "permission_sets", &[])
            .await
    }

    async fn get_project_member(&self, domain: &str, project_name: &str, member_id: i64) -> Result<Member, ApiError> {
        self.get_one(&self.project_url(domain, project_name, &["members", &member_id.to_string()]))
            .await
    }

    async fn get_project_members(&self, domain: &str, project_name: &str) -> Result<Vec<Member>, ApiError> {
        self.get_list_all(&self.project_url(domain, project_name, &["members"]), "members", &[])
            .await
    }

    async fn get_project_group(&self, domain: &str, project_name: &str, group_id: i64) -> Result<Group, ApiError> {
        self.get_one(&self.project_url(domain, project_name, &["groups", &group_id.to_string()]))
            .await
    }

    async fn get_project_groups(&self, domain: &str, project_name: &str) -> Result<Vec<Group>, ApiError> {
        self.get_list(&self.project_url(domain, project_name, &["groups"]), "groups", &[])
            .await
    }

    async fn get_integration(&self, domain: &str, hash_id: &str) -> Result<Integration, ApiError> {
        self.get_one(&self.workspace_url(domain, &["integrations", hash_id]))
            .await
    }

    async fn get_integrations(&self, domain: &str) -> Result<Vec<Integration>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["integrations"]), "integrations", &[])
            .await
    }

    async fn get_pipeline(&self, domain: &str, project_name: &str, pipeline_id: i64) -> Result<Pipeline, ApiError> {
        self.get_one(&self.project_url(domain, project_name, &["pipelines", &pipeline_id.to_string()]))
            .await
    }

    async fn get_pipelines(&self, domain: &str, project_name: &str) -> Result<Vec<Pipeline>, ApiError> {
        self.get_list_all(&self.project_url(domain, project_name, &["pipelines"]), "pipelines", &[])
            .await
    }

    async fn get_environment(&self, domain: &str, project_name: &str, environment_id: &str) -> Result<Environment, ApiError> {
        self.get_one(&self.project_url(domain, project_name, &["environments", environment_id]))
            .await
    }

    async fn get_environments(&self, domain: &str, project_name: &str) -> Result<Vec<Environment>, ApiError> {
        self.get_list(&self.project_url(domain, project_name, &["environments"]), "environments", &[])
            .await
    }

    async fn get_sandbox(&self, domain: &str, sandbox_id: &str) -> Result<Sandbox, ApiError> {
        self.get_one(&self.workspace_url(domain, &["sandboxes", sandbox_id]))
            .await
    }

    async fn get_sandboxes(&self, domain: &str, query: &SandboxQuery) -> Result<Vec<Sandbox>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["sandboxes"]), "sandboxes", &query.params())
            .await
    }

    async fn get_target(&self, domain: &str, target_id: &str) -> Result<Target, ApiError> {
        self.get_one(&self.workspace_url(domain, &["targets", target_id]))
            .await
    }

    async fn get_targets(&self, domain: &str, query: &TargetQuery) -> Result<Vec<Target>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["targets"]), "targets", &query.params())
            .await
    }

    async fn get_variable(&self, domain: &str, variable_id: i64) -> Result<Variable, ApiError> {
        self.get_one(&self.workspace_url(domain, &["variables", &variable_id.to_string()]))
            .await
    }

    async fn get_variables(&self, domain: &str, query: &VariableQuery) -> Result<Vec<Variable>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["variables"]), "variables", &query.params())
            .await
    }

    async fn get_webhook(&self, domain: &str, webhook_id: i64) -> Result<Webhook, ApiError> {
        self.get_one(&self.workspace_url(domain, &["webhooks", &webhook_id.to_string()]))
            .await
    }

    async fn get_webhooks(&self, domain: &str) -> Result<Vec<Webhook>, ApiError> {
        self.get_list(&self.workspace_url(domain, &["webhooks"]), "webhooks", &[])
            .await
    }

    async fn get_profile(&self) -> Result<Profile, ApiError> {
        self.get_one(&self.url(&["user"])).await
    }
}
