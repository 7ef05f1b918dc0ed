use super::{
    domain_attribute, id_attribute, id_selector, list_id, project_name_attribute, regex_attribute, selector, triple_id,
};
use crate::bridge;
use crate::buddy::models::Pipeline;
use crate::buddy::BuddyApi;
use crate::entities::pipeline::{PipelineFields, PipelineSummaryFields};
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue, Value,
};
use async_trait::async_trait;

/// `buddy_pipeline`
pub struct PipelineDataSource;

#[derive(Debug, Clone, Default)]
pub struct PipelineModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub pipeline: PipelineFields,
}

impl Record for PipelineModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            pipeline: PipelineFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.pipeline
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
impl ReadSpec for PipelineDataSource {
    type Model = PipelineModel;
    type Dto = Pipeline;

    const TYPE_NAME: &'static str = "buddy_pipeline";

    fn schema() -> Schema {
        Schema::new("Get a pipeline by name or pipeline ID")
            .attrs(PipelineFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr("pipeline_id", id_selector("The pipeline's ID"))
            .attr("name", selector(AttrType::String, "The pipeline's name"))
            .exactly_one_of(&["pipeline_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &PipelineModel, diags: &mut Diagnostics) -> Option<Pipeline> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let selected = Selector::require(&model.pipeline.pipeline_id, &model.pipeline.name, ["pipeline_id", "name"]);
        let result = match selected {
            Ok(Selector::Id(pipeline_id)) => api
                .get_pipeline(domain, project_name, pipeline_id)
                .await
                .or_diagnostic("pipeline", "get pipeline"),
            Ok(Selector::Key(name)) => api
                .get_pipelines(domain, project_name)
                .await
                .or_diagnostic("pipeline", "get pipelines")
                .and_then(|all| first_match(all, "pipeline", |p| p.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: PipelineModel, dto: Pipeline, _diags: &mut Diagnostics) -> PipelineModel {
        model.id = triple_id(&model.domain, &model.project_name, &dto.id.to_string());
        model.pipeline = PipelineFields::load(&dto);
        model
    }
}

/// `buddy_pipelines`
pub struct PipelinesDataSource;

#[derive(Debug, Clone, Default)]
pub struct PipelinesModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub name_regex: Value<String>,
    pub pipelines: Value<Vec<PipelineSummaryFields>>,
}

impl Record for PipelinesModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            name_regex: r.string("name_regex"),
            pipelines: r.set("pipelines"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("project_name", &self.project_name)
            .string("name_regex", &self.name_regex)
            .set("pipelines", &self.pipelines)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for PipelinesDataSource {
    type Model = PipelinesModel;
    type Dto = Vec<Pipeline>;

    const TYPE_NAME: &'static str = "buddy_pipelines";

    fn schema() -> Schema {
        Schema::new("List pipelines of a project and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr(
                "name_regex",
                regex_attribute("The pipeline's name regular expression to match"),
            )
            .attr(
                "pipelines",
                computed_set::<PipelineSummaryFields>("List of pipelines"),
            )
    }

    async fn fetch(api: &dyn BuddyApi, model: &PipelinesModel, diags: &mut Diagnostics) -> Option<Vec<Pipeline>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let all = diags.capture(
            api.get_pipelines(domain, project_name)
                .await
                .or_diagnostic("pipelines", "get pipelines"),
        )?;
        let filter = diags.capture(ListFilter::new().regex(&model.name_regex, "name_regex", |p: &Pipeline| {
            p.name.as_str()
        }))?;
        Some(filter.apply(all))
    }

    fn map(mut model: PipelinesModel, dtos: Vec<Pipeline>, _diags: &mut Diagnostics) -> PipelinesModel {
        model.id = list_id();
        model.pipelines = bridge::object_set(&dtos, PipelineSummaryFields::load);
        model
    }
}
