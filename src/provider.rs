//! Data-source registry
//!
//! Every data source the provider exposes, keyed by the type name the
//! host uses. All of them share one [`BuddyApi`] handle.

use crate::buddy::BuddyApi;
use crate::datasources::environment::{EnvironmentDataSource, EnvironmentsDataSource};
use crate::datasources::group::{GroupDataSource, GroupMembersDataSource, GroupsDataSource};
use crate::datasources::integration::{IntegrationDataSource, IntegrationsDataSource};
use crate::datasources::member::{MemberDataSource, MembersDataSource};
use crate::datasources::permission::{PermissionDataSource, PermissionsDataSource};
use crate::datasources::pipeline::{PipelineDataSource, PipelinesDataSource};
use crate::datasources::profile::ProfileDataSource;
use crate::datasources::project::{ProjectDataSource, ProjectsDataSource};
use crate::datasources::project_access::{
    ProjectGroupDataSource, ProjectGroupsDataSource, ProjectMemberDataSource, ProjectMembersDataSource,
};
use crate::datasources::sandbox::{SandboxDataSource, SandboxesDataSource};
use crate::datasources::target::{TargetDataSource, TargetsDataSource};
use crate::datasources::variable::{VariableDataSource, VariableSshKeyDataSource};
use crate::datasources::webhook::{WebhookDataSource, WebhooksDataSource};
use crate::datasources::workspace::{WorkspaceDataSource, WorkspacesDataSource};
use crate::framework::{DataSource, Diagnostic, DiagnosticKind, ReadContext, ReadResponse, Shell, StateValue};
use std::sync::Arc;

/// Name prefix shared by every data source type
pub const TYPE_PREFIX: &str = "buddy_";

/// One read request: a data source type and its configuration
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub type_name: String,
    pub config: StateValue,
}

pub struct Provider {
    data_sources: Vec<Box<dyn DataSource>>,
}

impl Provider {
    pub fn new(api: Arc<dyn BuddyApi>) -> Self {
        let data_sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(Shell::<WorkspaceDataSource>::new(api.clone())),
            Box::new(Shell::<WorkspacesDataSource>::new(api.clone())),
            Box::new(Shell::<ProjectDataSource>::new(api.clone())),
            Box::new(Shell::<ProjectsDataSource>::new(api.clone())),
            Box::new(Shell::<GroupDataSource>::new(api.clone())),
            Box::new(Shell::<GroupsDataSource>::new(api.clone())),
            Box::new(Shell::<GroupMembersDataSource>::new(api.clone())),
            Box::new(Shell::<MemberDataSource>::new(api.clone())),
            Box::new(Shell::<MembersDataSource>::new(api.clone())),
            Box::new(Shell::<PermissionDataSource>::new(api.clone())),
            Box::new(Shell::<PermissionsDataSource>::new(api.clone())),
            Box::new(Shell::<ProjectMemberDataSource>::new(api.clone())),
            Box::new(Shell::<ProjectMembersDataSource>::new(api.clone())),
            Box::new(Shell::<ProjectGroupDataSource>::new(api.clone())),
            Box::new(Shell::<ProjectGroupsDataSource>::new(api.clone())),
            Box::new(Shell::<IntegrationDataSource>::new(api.clone())),
            Box::new(Shell::<IntegrationsDataSource>::new(api.clone())),
            Box::new(Shell::<PipelineDataSource>::new(api.clone())),
            Box::new(Shell::<PipelinesDataSource>::new(api.clone())),
            Box::new(Shell::<EnvironmentDataSource>::new(api.clone())),
            Box::new(Shell::<EnvironmentsDataSource>::new(api.clone())),
            Box::new(Shell::<SandboxDataSource>::new(api.clone())),
            Box::new(Shell::<SandboxesDataSource>::new(api.clone())),
            Box::new(Shell::<TargetDataSource>::new(api.clone())),
            Box::new(Shell::<TargetsDataSource>::new(api.clone())),
            Box::new(Shell::<VariableDataSource>::new(api.clone())),
            Box::new(Shell::<VariableSshKeyDataSource>::new(api.clone())),
            Box::new(Shell::<WebhookDataSource>::new(api.clone())),
            Box::new(Shell::<WebhooksDataSource>::new(api.clone())),
            Box::new(Shell::<ProfileDataSource>::new(api)),
        ];
        Self { data_sources }
    }

    pub fn data_sources(&self) -> &[Box<dyn DataSource>] {
        &self.data_sources
    }

    /// Look up a data source by its type name
    pub fn get(&self, type_name: &str) -> Option<&dyn DataSource> {
        self.data_sources
            .iter()
            .find(|ds| ds.type_name() == type_name)
            .map(|ds| ds.as_ref())
    }

    /// All type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.data_sources.iter().map(|ds| ds.type_name()).collect();
        names.sort_unstable();
        names
    }

    /// Read one data source by type name
    pub async fn read(&self, ctx: &ReadContext, type_name: &str, config: &StateValue) -> ReadResponse {
        match self.get(type_name) {
            Some(ds) => ds.read(ctx, config).await,
            None => {
                tracing::warn!(type_name, "unknown data source type");
                ReadResponse {
                    state: None,
                    diagnostics: Diagnostic::error(
                        DiagnosticKind::Configuration,
                        "Unknown data source",
                        format!("no data source named {:?} is registered", type_name),
                    )
                    .into(),
                }
            }
        }
    }

    /// Run several reads concurrently; responses come back in request order
    pub async fn read_many(&self, ctx: &ReadContext, requests: &[ReadRequest]) -> Vec<ReadResponse> {
        futures::future::join_all(
            requests
                .iter()
                .map(|request| self.read(ctx, &request.type_name, &request.config)),
        )
        .await
    }
}
