use super::{domain_attribute, double_id, id_attribute, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Project;
use crate::buddy::query::ProjectQuery;
use crate::buddy::BuddyApi;
use crate::entities::project::{ProjectFields, PROJECT_STATUSES};
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// `buddy_project`
pub struct ProjectDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project: ProjectFields,
}

impl Record for ProjectModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project: ProjectFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.project
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProjectDataSource {
    type Model = ProjectModel;
    type Dto = Project;

    const TYPE_NAME: &'static str = "buddy_project";

    fn schema() -> Schema {
        Schema::new("Get a project by name or display name")
            .attrs(ProjectFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "name",
                selector(AttrType::String, "The project's unique name").validate(Validator::Slug),
            )
            .attr("display_name", selector(AttrType::String, "The project's display name"))
            .exactly_one_of(&["name", "display_name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &ProjectModel, diags: &mut Diagnostics) -> Option<Project> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(&model.project.name, &model.project.display_name, ["name", "display_name"]);
        let result = match selected {
            Ok(Selector::Id(name)) => api
                .get_project(domain, &name)
                .await
                .or_diagnostic("project", "get project"),
            Ok(Selector::Key(display_name)) => api
                .get_projects(domain, &ProjectQuery::default())
                .await
                .or_diagnostic("project", "get projects")
                .and_then(|all| first_match(all, "project", |p| p.display_name == display_name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: ProjectModel, dto: Project, _diags: &mut Diagnostics) -> ProjectModel {
        model.id = double_id(&model.domain, &dto.name);
        model.project = ProjectFields::load(&dto);
        model
    }
}

/// `buddy_projects`
pub struct ProjectsDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProjectsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub name_regex: Value<String>,
    pub display_name_regex: Value<String>,
    pub status: Value<String>,
    pub membership: Value<bool>,
    pub projects: Value<Vec<ProjectFields>>,
}

impl ProjectsModel {
    fn query(&self) -> ProjectQuery {
        ProjectQuery {
            status: self.status.as_known().cloned(),
            membership: self.membership.get(),
        }
    }
}

impl Record for ProjectsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            name_regex: r.string("name_regex"),
            display_name_regex: r.string("display_name_regex"),
            status: r.string("status"),
            membership: r.bool("membership"),
            projects: r.set("projects"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("name_regex", &self.name_regex)
            .string("display_name_regex", &self.display_name_regex)
            .string("status", &self.status)
            .bool("membership", &self.membership)
            .set("projects", &self.projects)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProjectsDataSource {
    type Model = ProjectsModel;
    type Dto = Vec<Project>;

    const TYPE_NAME: &'static str = "buddy_projects";

    fn schema() -> Schema {
        Schema::new("List projects and optionally filter them by name, display name or status")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "name_regex",
                regex_attribute("The project's name regular expression to match"),
            )
            .attr(
                "display_name_regex",
                regex_attribute("The project's display name regular expression to match"),
            )
            .attr(
                "status",
                Attribute::optional(AttrType::String)
                    .describe("Get only projects with this status")
                    .validate(Validator::OneOf(PROJECT_STATUSES)),
            )
            .attr(
                "membership",
                Attribute::optional(AttrType::Bool)
                    .describe("Get only projects the authenticated member belongs to"),
            )
            .attr("projects", computed_set::<ProjectFields>("List of projects"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &ProjectsModel, diags: &mut Diagnostics) -> Option<Vec<Project>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(
            api.get_projects(domain, &model.query())
                .await
                .or_diagnostic("projects", "get projects"),
        )?;
        let filter = diags.capture(
            ListFilter::new()
                .regex(&model.name_regex, "name_regex", |p: &Project| p.name.as_str())
                .and_then(|f| {
                    f.regex(&model.display_name_regex, "display_name_regex", |p: &Project| {
                        p.display_name.as_str()
                    })
                }),
        )?;
        let filter = filter.equals(&model.status, |p: &Project| p.status.as_str());
        Some(filter.apply(all))
    }

    fn map(mut model: ProjectsModel, dtos: Vec<Project>, _diags: &mut Diagnostics) -> ProjectsModel {
        model.id = list_id();
        model.projects = bridge::object_set(&dtos, ProjectFields::load);
        model
    }
}
