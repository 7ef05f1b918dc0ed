use super::{domain_attribute, id_attribute, list_id, project_name_attribute, regex_attribute, selector, triple_id};
use crate::bridge;
use crate::buddy::models::Environment;
use crate::buddy::BuddyApi;
use crate::entities::environment::EnvironmentFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue, Value,
};
use async_trait::async_trait;

/// `buddy_environment`
pub struct EnvironmentDataSource;

#[derive(Debug, Clone, Default)]
pub struct EnvironmentModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub environment: EnvironmentFields,
}

impl Record for EnvironmentModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            environment: EnvironmentFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.environment
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
impl ReadSpec for EnvironmentDataSource {
    type Model = EnvironmentModel;
    type Dto = Environment;

    const TYPE_NAME: &'static str = "buddy_environment";

    fn schema() -> Schema {
        Schema::new("Get an environment by name or environment ID")
            .attrs(EnvironmentFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr("environment_id", selector(AttrType::String, "The environment's ID"))
            .attr("name", selector(AttrType::String, "The environment's name"))
            .exactly_one_of(&["environment_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &EnvironmentModel, diags: &mut Diagnostics) -> Option<Environment> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let selected = Selector::require(
            &model.environment.environment_id,
            &model.environment.name,
            ["environment_id", "name"],
        );
        let result = match selected {
            Ok(Selector::Id(environment_id)) => api
                .get_environment(domain, project_name, &environment_id)
                .await
                .or_diagnostic("environment", "get environment"),
            Ok(Selector::Key(name)) => api
                .get_environments(domain, project_name)
                .await
                .or_diagnostic("environment", "get environments")
                .and_then(|all| first_match(all, "environment", |e| e.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: EnvironmentModel, dto: Environment, _diags: &mut Diagnostics) -> EnvironmentModel {
        model.id = triple_id(&model.domain, &model.project_name, &dto.id);
        model.environment = EnvironmentFields::load(&dto);
        model
    }
}

/// `buddy_environments`
pub struct EnvironmentsDataSource;

#[derive(Debug, Clone, Default)]
pub struct EnvironmentsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub name_regex: Value<String>,
    pub environments: Value<Vec<EnvironmentFields>>,
}

impl Record for EnvironmentsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            name_regex: r.string("name_regex"),
            environments: r.set("environments"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("project_name", &self.project_name)
            .string("name_regex", &self.name_regex)
            .set("environments", &self.environments)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for EnvironmentsDataSource {
    type Model = EnvironmentsModel;
    type Dto = Vec<Environment>;

    const TYPE_NAME: &'static str = "buddy_environments";

    fn schema() -> Schema {
        Schema::new("List environments of a project and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr(
                "name_regex",
                regex_attribute("The environment's name regular expression to match"),
            )
            .attr(
                "environments",
                computed_set::<EnvironmentFields>("List of environments"),
            )
    }

    async fn fetch(api: &dyn BuddyApi, model: &EnvironmentsModel, diags: &mut Diagnostics) -> Option<Vec<Environment>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let all = diags.capture(
            api.get_environments(domain, project_name)
                .await
                .or_diagnostic("environments", "get environments"),
        )?;
        let filter = diags.capture(
            ListFilter::new().regex(&model.name_regex, "name_regex", |e: &Environment| e.name.as_str()),
        )?;
        Some(filter.apply(all))
    }

    fn map(mut model: EnvironmentsModel, dtos: Vec<Environment>, _diags: &mut Diagnostics) -> EnvironmentsModel {
        model.id = list_id();
        model.environments = bridge::object_set(&dtos, EnvironmentFields::load);
        model
    }
}
