use super::{id_attribute, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Workspace;
use crate::buddy::BuddyApi;
use crate::entities::workspace::WorkspaceFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue, Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// `buddy_workspace`
pub struct WorkspaceDataSource;

#[derive(Debug, Clone, Default)]
pub struct WorkspaceModel {
    pub id: Value<String>,
    pub workspace: WorkspaceFields,
}

impl Record for WorkspaceModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            workspace: WorkspaceFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.workspace
            .write(ObjectBuilder::new(path).string("id", &self.id))
            .finish()
    }
}

#[async_trait]
impl ReadSpec for WorkspaceDataSource {
    type Model = WorkspaceModel;
    type Dto = Workspace;

    const TYPE_NAME: &'static str = "buddy_workspace";

    fn schema() -> Schema {
        Schema::new("Get a workspace by domain or name")
            .attrs(WorkspaceFields::attributes())
            .attr("id", id_attribute())
            .attr(
                "domain",
                selector(AttrType::String, "The workspace's URL handle").validate(Validator::Domain),
            )
            .attr("name", selector(AttrType::String, "The workspace's name"))
            .exactly_one_of(&["domain", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &WorkspaceModel, diags: &mut Diagnostics) -> Option<Workspace> {
        let selected = Selector::require(&model.workspace.domain, &model.workspace.name, ["domain", "name"]);
        let result = match selected {
            Ok(Selector::Id(domain)) => api
                .get_workspace(&domain)
                .await
                .or_diagnostic("workspace", "get workspace"),
            Ok(Selector::Key(name)) => api
                .get_workspaces()
                .await
                .or_diagnostic("workspace", "get workspaces")
                .and_then(|all| first_match(all, "workspace", |w| w.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: WorkspaceModel, dto: Workspace, _diags: &mut Diagnostics) -> WorkspaceModel {
        model.id = bridge::string(&dto.domain);
        model.workspace = WorkspaceFields::load(&dto);
        model
    }
}

/// `buddy_workspaces`
pub struct WorkspacesDataSource;

#[derive(Debug, Clone, Default)]
pub struct WorkspacesModel {
    pub id: Value<String>,
    pub name_regex: Value<String>,
    pub domain_regex: Value<String>,
    pub workspaces: Value<Vec<WorkspaceFields>>,
}

impl Record for WorkspacesModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            name_regex: r.string("name_regex"),
            domain_regex: r.string("domain_regex"),
            workspaces: r.set("workspaces"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("name_regex", &self.name_regex)
            .string("domain_regex", &self.domain_regex)
            .set("workspaces", &self.workspaces)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for WorkspacesDataSource {
    type Model = WorkspacesModel;
    type Dto = Vec<Workspace>;

    const TYPE_NAME: &'static str = "buddy_workspaces";

    fn schema() -> Schema {
        Schema::new("List workspaces and optionally filter them by name or domain")
            .attr("id", id_attribute())
            .attr(
                "name_regex",
                regex_attribute("The workspace's name regular expression to match"),
            )
            .attr(
                "domain_regex",
                regex_attribute("The workspace's domain regular expression to match"),
            )
            .attr(
                "workspaces",
                computed_set::<WorkspaceFields>("List of workspaces"),
            )
    }

    async fn fetch(api: &dyn BuddyApi, model: &WorkspacesModel, diags: &mut Diagnostics) -> Option<Vec<Workspace>> {
        let all = diags.capture(api.get_workspaces().await.or_diagnostic("workspaces", "get workspaces"))?;
        let filter = diags.capture(
            ListFilter::new()
                .regex(&model.name_regex, "name_regex", |w: &Workspace| w.name.as_str())
                .and_then(|f| f.regex(&model.domain_regex, "domain_regex", |w: &Workspace| w.domain.as_str())),
        )?;
        Some(filter.apply(all))
    }

    fn map(mut model: WorkspacesModel, dtos: Vec<Workspace>, _diags: &mut Diagnostics) -> WorkspacesModel {
        model.id = list_id();
        model.workspaces = bridge::object_set(&dtos, WorkspaceFields::load);
        model
    }
}
