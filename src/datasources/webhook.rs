use super::{domain_attribute, double_id, id_attribute, id_selector, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Webhook;
use crate::buddy::BuddyApi;
use crate::entities::webhook::WebhookFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue, Value,
};
use async_trait::async_trait;

/// `buddy_webhook`
pub struct WebhookDataSource;

#[derive(Debug, Clone, Default)]
pub struct WebhookModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub webhook: WebhookFields,
}

impl Record for WebhookModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            webhook: WebhookFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.webhook
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for WebhookDataSource {
    type Model = WebhookModel;
    type Dto = Webhook;

    const TYPE_NAME: &'static str = "buddy_webhook";

    fn schema() -> Schema {
        Schema::new("Get a webhook by target URL or webhook ID")
            .attrs(WebhookFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("webhook_id", id_selector("The webhook's ID"))
            .attr("target_url", selector(AttrType::String, "The webhook's target URL"))
            .exactly_one_of(&["webhook_id", "target_url"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &WebhookModel, diags: &mut Diagnostics) -> Option<Webhook> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(
            &model.webhook.webhook_id,
            &model.webhook.target_url,
            ["webhook_id", "target_url"],
        );
        let result = match selected {
            Ok(Selector::Id(webhook_id)) => api
                .get_webhook(domain, webhook_id)
                .await
                .or_diagnostic("webhook", "get webhook"),
            Ok(Selector::Key(target_url)) => api
                .get_webhooks(domain)
                .await
                .or_diagnostic("webhook", "get webhooks")
                .and_then(|all| first_match(all, "webhook", |w| w.target_url == target_url)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: WebhookModel, dto: Webhook, _diags: &mut Diagnostics) -> WebhookModel {
        model.id = double_id(&model.domain, &dto.id.to_string());
        model.webhook = WebhookFields::load(&dto);
        model
    }
}

/// `buddy_webhooks`
pub struct WebhooksDataSource;

#[derive(Debug, Clone, Default)]
pub struct WebhooksModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub target_url_regex: Value<String>,
    pub webhooks: Value<Vec<WebhookFields>>,
}

impl Record for WebhooksModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            target_url_regex: r.string("target_url_regex"),
            webhooks: r.set("webhooks"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("target_url_regex", &self.target_url_regex)
            .set("webhooks", &self.webhooks)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for WebhooksDataSource {
    type Model = WebhooksModel;
    type Dto = Vec<Webhook>;

    const TYPE_NAME: &'static str = "buddy_webhooks";

    fn schema() -> Schema {
        Schema::new("List webhooks and optionally filter them by target URL")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "target_url_regex",
                regex_attribute("The webhook's target URL regular expression to match"),
            )
            .attr("webhooks", computed_set::<WebhookFields>("List of webhooks"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &WebhooksModel, diags: &mut Diagnostics) -> Option<Vec<Webhook>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(api.get_webhooks(domain).await.or_diagnostic("webhooks", "get webhooks"))?;
        let filter = diags.capture(ListFilter::new().regex(
            &model.target_url_regex,
            "target_url_regex",
            |w: &Webhook| w.target_url.as_str(),
        ))?;
        Some(filter.apply(all))
    }

    fn map(mut model: WebhooksModel, dtos: Vec<Webhook>, _diags: &mut Diagnostics) -> WebhooksModel {
        model.id = list_id();
        model.webhooks = bridge::object_set(&dtos, WebhookFields::load);
        model
    }
}
