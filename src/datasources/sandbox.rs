use super::{domain_attribute, double_id, id_attribute, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Sandbox;
use crate::buddy::query::SandboxQuery;
use crate::buddy::BuddyApi;
use crate::entities::sandbox::SandboxFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

fn scope_query(project_name: &Value<String>) -> SandboxQuery {
    SandboxQuery {
        project_name: project_name.as_known().cloned(),
    }
}

/// `buddy_sandbox`
pub struct SandboxDataSource;

#[derive(Debug, Clone, Default)]
pub struct SandboxModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub sandbox: SandboxFields,
}

impl Record for SandboxModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            sandbox: SandboxFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.sandbox
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain)
                    .string("project_name", &self.project_name),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for SandboxDataSource {
    type Model = SandboxModel;
    type Dto = Sandbox;

    const TYPE_NAME: &'static str = "buddy_sandbox";

    fn schema() -> Schema {
        Schema::new("Get a sandbox by name or sandbox ID")
            .attrs(SandboxFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "project_name",
                selector(AttrType::String, "Project the sandbox belongs to").validate(Validator::Slug),
            )
            .attr("sandbox_id", selector(AttrType::String, "The sandbox's ID"))
            .attr("name", selector(AttrType::String, "The sandbox's name"))
            .exactly_one_of(&["sandbox_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &SandboxModel, diags: &mut Diagnostics) -> Option<Sandbox> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(&model.sandbox.sandbox_id, &model.sandbox.name, ["sandbox_id", "name"]);
        let result = match selected {
            Ok(Selector::Id(sandbox_id)) => api
                .get_sandbox(domain, &sandbox_id)
                .await
                .or_diagnostic("sandbox", "get sandbox"),
            Ok(Selector::Key(name)) => api
                .get_sandboxes(domain, &scope_query(&model.project_name))
                .await
                .or_diagnostic("sandbox", "get sandboxes")
                .and_then(|all| first_match(all, "sandbox", |s| s.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: SandboxModel, dto: Sandbox, _diags: &mut Diagnostics) -> SandboxModel {
        model.id = double_id(&model.domain, &dto.id);
        model.project_name = bridge::opt_string(dto.project.as_ref().map(|p| p.name.as_str()))
            .or(model.project_name);
        model.sandbox = SandboxFields::load(&dto);
        model
    }
}

/// `buddy_sandboxes`
pub struct SandboxesDataSource;

#[derive(Debug, Clone, Default)]
pub struct SandboxesModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub name_regex: Value<String>,
    pub sandboxes: Value<Vec<SandboxFields>>,
}

impl Record for SandboxesModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            name_regex: r.string("name_regex"),
            sandboxes: r.set("sandboxes"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("project_name", &self.project_name)
            .string("name_regex", &self.name_regex)
            .set("sandboxes", &self.sandboxes)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for SandboxesDataSource {
    type Model = SandboxesModel;
    type Dto = Vec<Sandbox>;

    const TYPE_NAME: &'static str = "buddy_sandboxes";

    fn schema() -> Schema {
        Schema::new("List sandboxes and optionally filter them by project or name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "project_name",
                Attribute::optional(AttrType::String)
                    .describe("Get only sandboxes of this project")
                    .validate(Validator::Slug),
            )
            .attr(
                "name_regex",
                regex_attribute("The sandbox's name regular expression to match"),
            )
            .attr("sandboxes", computed_set::<SandboxFields>("List of sandboxes"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &SandboxesModel, diags: &mut Diagnostics) -> Option<Vec<Sandbox>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(
            api.get_sandboxes(domain, &scope_query(&model.project_name))
                .await
                .or_diagnostic("sandboxes", "get sandboxes"),
        )?;
        let filter = diags.capture(
            ListFilter::new().regex(&model.name_regex, "name_regex", |s: &Sandbox| s.name.as_str()),
        )?;
        Some(filter.apply(all))
    }

    fn map(mut model: SandboxesModel, dtos: Vec<Sandbox>, _diags: &mut Diagnostics) -> SandboxesModel {
        model.id = list_id();
        model.sandboxes = bridge::object_set(&dtos, SandboxFields::load);
        model
    }
}
