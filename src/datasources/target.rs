//! Targets
//!
//! Targets live at workspace, project, pipeline or environment level.
//! The optional scope attributes narrow the list call; on the single
//! data source they are filled in from the target that was read.

use super::{domain_attribute, double_id, id_attribute, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Target;
use crate::buddy::query::TargetQuery;
use crate::buddy::BuddyApi;
use crate::entities::target::TargetFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// Level a target is defined at
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetScope {
    pub project_name: Value<String>,
    pub pipeline_id: Value<i64>,
    pub environment_id: Value<String>,
}

impl TargetScope {
    fn attributes(computed: bool) -> Vec<(&'static str, Attribute)> {
        let attr = |ty: AttrType| {
            if computed {
                Attribute::optional_computed(ty)
            } else {
                Attribute::optional(ty)
            }
        };
        vec![
            (
                "project_name",
                attr(AttrType::String)
                    .describe("Project the target is defined in")
                    .validate(Validator::Slug),
            ),
            (
                "pipeline_id",
                attr(AttrType::Int64).describe("Pipeline the target is defined in"),
            ),
            (
                "environment_id",
                attr(AttrType::String).describe("Environment the target is defined in"),
            ),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            project_name: r.string("project_name"),
            pipeline_id: r.int64("pipeline_id"),
            environment_id: r.string("environment_id"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("project_name", &self.project_name)
            .int64("pipeline_id", &self.pipeline_id)
            .string("environment_id", &self.environment_id)
    }

    fn query(&self) -> TargetQuery {
        TargetQuery {
            project_name: self.project_name.as_known().cloned(),
            pipeline_id: self.pipeline_id.get(),
            environment_id: self.environment_id.as_known().cloned(),
        }
    }

    /// Scope of a fetched target, falling back to the requested one
    fn resolve(dto: &Target, requested: &TargetScope) -> Self {
        Self {
            project_name: bridge::opt_string(dto.project.as_ref().map(|p| p.name.as_str()))
                .or(requested.project_name.clone()),
            pipeline_id: bridge::opt_int64(dto.pipeline.as_ref().map(|p| p.id))
                .or(requested.pipeline_id.clone()),
            environment_id: bridge::opt_string(dto.environment.as_ref().map(|e| e.id.as_str()))
                .or(requested.environment_id.clone()),
        }
    }
}

/// `buddy_target`
pub struct TargetDataSource;

#[derive(Debug, Clone, Default)]
pub struct TargetModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub scope: TargetScope,
    pub target: TargetFields,
}

impl Record for TargetModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            scope: TargetScope::read(&mut r),
            target: TargetFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        let builder = ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain);
        self.target.write(self.scope.write(builder)).finish()
    }
}

#[async_trait]
impl ReadSpec for TargetDataSource {
    type Model = TargetModel;
    type Dto = Target;

    const TYPE_NAME: &'static str = "buddy_target";

    fn schema() -> Schema {
        Schema::new("Get a target by name or target ID")
            .attrs(TargetFields::attributes())
            .attrs(TargetScope::attributes(true))
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("target_id", selector(AttrType::String, "The target's ID"))
            .attr("name", selector(AttrType::String, "The target's name"))
            .exactly_one_of(&["target_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &TargetModel, diags: &mut Diagnostics) -> Option<Target> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(&model.target.target_id, &model.target.name, ["target_id", "name"]);
        let result = match selected {
            Ok(Selector::Id(target_id)) => api
                .get_target(domain, &target_id)
                .await
                .or_diagnostic("target", "get target"),
            Ok(Selector::Key(name)) => api
                .get_targets(domain, &model.scope.query())
                .await
                .or_diagnostic("target", "get targets")
                .and_then(|all| first_match(all, "target", |t| t.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: TargetModel, dto: Target, _diags: &mut Diagnostics) -> TargetModel {
        model.id = double_id(&model.domain, &dto.id);
        model.scope = TargetScope::resolve(&dto, &model.scope);
        model.target = TargetFields::load(&dto);
        model
    }
}

/// `buddy_targets`
pub struct TargetsDataSource;

#[derive(Debug, Clone, Default)]
pub struct TargetsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub scope: TargetScope,
    pub name_regex: Value<String>,
    pub targets: Value<Vec<TargetFields>>,
}

impl Record for TargetsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            scope: TargetScope::read(&mut r),
            name_regex: r.string("name_regex"),
            targets: r.set("targets"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        let builder = ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("name_regex", &self.name_regex)
            .set("targets", &self.targets);
        self.scope.write(builder).finish()
    }
}

#[async_trait]
impl ReadSpec for TargetsDataSource {
    type Model = TargetsModel;
    type Dto = Vec<Target>;

    const TYPE_NAME: &'static str = "buddy_targets";

    fn schema() -> Schema {
        Schema::new("List targets at a workspace, project, pipeline or environment level")
            .attrs(TargetScope::attributes(false))
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "name_regex",
                regex_attribute("The target's name regular expression to match"),
            )
            .attr("targets", computed_set::<TargetFields>("List of targets"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &TargetsModel, diags: &mut Diagnostics) -> Option<Vec<Target>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(
            api.get_targets(domain, &model.scope.query())
                .await
                .or_diagnostic("targets", "get targets"),
        )?;
        let filter = diags.capture(
            ListFilter::new().regex(&model.name_regex, "name_regex", |t: &Target| t.name.as_str()),
        )?;
        Some(filter.apply(all))
    }

    fn map(mut model: TargetsModel, dtos: Vec<Target>, _diags: &mut Diagnostics) -> TargetsModel {
        model.id = list_id();
        model.targets = bridge::object_set(&dtos, TargetFields::load);
        model
    }
}
