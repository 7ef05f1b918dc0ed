//! Query options for scoped list calls

/// Filters for listing projects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub status: Option<String>,
    /// Only projects the authenticated member belongs to
    pub membership: Option<bool>,
}

impl ProjectQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = &self.status {
            params.push(("status", status.clone()));
        }
        if let Some(membership) = self.membership {
            params.push(("membership", membership.to_string()));
        }
        params
    }
}

/// Scope for listing sandboxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxQuery {
    pub project_name: Option<String>,
}

impl SandboxQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.project_name
            .iter()
            .map(|p| ("project_name", p.clone()))
            .collect()
    }
}

/// Scope for listing targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetQuery {
    pub project_name: Option<String>,
    pub pipeline_id: Option<i64>,
    pub environment_id: Option<String>,
}

impl TargetQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(project) = &self.project_name {
            params.push(("project_name", project.clone()));
        }
        if let Some(pipeline) = self.pipeline_id {
            params.push(("pipeline_id", pipeline.to_string()));
        }
        if let Some(environment) = &self.environment_id {
            params.push(("environment_id", environment.clone()));
        }
        params
    }
}

/// Scope for listing variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableQuery {
    pub project_name: Option<String>,
    pub pipeline_id: Option<i64>,
    pub action_id: Option<i64>,
    pub environment_id: Option<String>,
}

impl VariableQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(project) = &self.project_name {
            params.push(("projectName", project.clone()));
        }
        if let Some(pipeline) = self.pipeline_id {
            params.push(("pipelineId", pipeline.to_string()));
        }
        if let Some(action) = self.action_id {
            params.push(("actionId", action.to_string()));
        }
        if let Some(environment) = &self.environment_id {
            params.push(("environmentId", environment.clone()));
        }
        params
    }
}
