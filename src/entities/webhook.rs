use super::{computed_int, computed_string, computed_strings, Fields};
use crate::bridge;
use crate::buddy::models::Webhook;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebhookFields {
    pub webhook_id: Value<i64>,
    pub target_url: Value<String>,
    pub secret_key: Value<String>,
    pub html_url: Value<String>,
    pub events: Value<Vec<String>>,
    pub projects: Value<Vec<String>>,
}

impl WebhookFields {
    pub fn load(dto: &Webhook) -> Self {
        Self {
            webhook_id: bridge::int64(dto.id),
            target_url: bridge::string(&dto.target_url),
            secret_key: bridge::string(&dto.secret_key),
            html_url: bridge::string(&dto.html_url),
            events: bridge::string_set(&dto.events),
            projects: bridge::string_set(&dto.projects),
        }
    }
}

impl Fields for WebhookFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("webhook_id", computed_int("The webhook's ID")),
            ("target_url", computed_string("URL the webhook posts to")),
            ("secret_key", computed_string("Key used to sign payloads").sensitive()),
            ("html_url", computed_string("The webhook's URL")),
            ("events", computed_strings("Events the webhook fires for")),
            ("projects", computed_strings("Projects the webhook fires for")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            webhook_id: r.int64("webhook_id"),
            target_url: r.string("target_url"),
            secret_key: r.string("secret_key"),
            html_url: r.string("html_url"),
            events: r.strings("events"),
            projects: r.strings("projects"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("webhook_id", &self.webhook_id)
            .string("target_url", &self.target_url)
            .string("secret_key", &self.secret_key)
            .string("html_url", &self.html_url)
            .strings("events", &self.events)
            .strings("projects", &self.projects)
    }
}

nested_object!(WebhookFields);
