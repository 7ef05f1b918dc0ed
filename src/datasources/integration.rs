use super::{domain_attribute, double_id, id_attribute, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Integration;
use crate::buddy::BuddyApi;
use crate::entities::integration::{IntegrationFields, INTEGRATION_TYPES};
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// `buddy_integration`
pub struct IntegrationDataSource;

#[derive(Debug, Clone, Default)]
pub struct IntegrationModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub integration: IntegrationFields,
}

impl Record for IntegrationModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            integration: IntegrationFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.integration
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for IntegrationDataSource {
    type Model = IntegrationModel;
    type Dto = Integration;

    const TYPE_NAME: &'static str = "buddy_integration";

    fn schema() -> Schema {
        Schema::new("Get an integration by name or integration ID")
            .attrs(IntegrationFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("integration_id", selector(AttrType::String, "The integration's hash ID"))
            .attr("name", selector(AttrType::String, "The integration's name"))
            .exactly_one_of(&["integration_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &IntegrationModel, diags: &mut Diagnostics) -> Option<Integration> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(
            &model.integration.integration_id,
            &model.integration.name,
            ["integration_id", "name"],
        );
        let result = match selected {
            Ok(Selector::Id(hash_id)) => api
                .get_integration(domain, &hash_id)
                .await
                .or_diagnostic("integration", "get integration"),
            Ok(Selector::Key(name)) => api
                .get_integrations(domain)
                .await
                .or_diagnostic("integration", "get integrations")
                .and_then(|all| first_match(all, "integration", |i| i.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: IntegrationModel, dto: Integration, _diags: &mut Diagnostics) -> IntegrationModel {
        model.id = double_id(&model.domain, &dto.hash_id);
        model.integration = IntegrationFields::load(&dto);
        model
    }
}

/// `buddy_integrations`
pub struct IntegrationsDataSource;

#[derive(Debug, Clone, Default)]
pub struct IntegrationsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub name_regex: Value<String>,
    pub kind: Value<String>,
    pub integrations: Value<Vec<IntegrationFields>>,
}

impl Record for IntegrationsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            name_regex: r.string("name_regex"),
            kind: r.string("type"),
            integrations: r.set("integrations"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("name_regex", &self.name_regex)
            .string("type", &self.kind)
            .set("integrations", &self.integrations)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for IntegrationsDataSource {
    type Model = IntegrationsModel;
    type Dto = Vec<Integration>;

    const TYPE_NAME: &'static str = "buddy_integrations";

    fn schema() -> Schema {
        Schema::new("List integrations and optionally filter them by name or type")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "name_regex",
                regex_attribute("The integration's name regular expression to match"),
            )
            .attr(
                "type",
                Attribute::optional(AttrType::String)
                    .describe("Get only integrations of this type")
                    .validate(Validator::OneOf(INTEGRATION_TYPES)),
            )
            .attr(
                "integrations",
                computed_set::<IntegrationFields>("List of integrations"),
            )
    }

    async fn fetch(api: &dyn BuddyApi, model: &IntegrationsModel, diags: &mut Diagnostics) -> Option<Vec<Integration>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(
            api.get_integrations(domain)
                .await
                .or_diagnostic("integrations", "get integrations"),
        )?;
        let filter = diags.capture(
            ListFilter::new().regex(&model.name_regex, "name_regex", |i: &Integration| i.name.as_str()),
        )?;
        let filter = filter.equals(&model.kind, |i: &Integration| i.kind.as_str());
        Some(filter.apply(all))
    }

    fn map(mut model: IntegrationsModel, dtos: Vec<Integration>, _diags: &mut Diagnostics) -> IntegrationsModel {
        model.id = list_id();
        model.integrations = bridge::object_set(&dtos, IntegrationFields::load);
        model
    }
}
