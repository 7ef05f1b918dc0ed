use super::common::{AllowedPipelineFields, PermissionFamily, PermissionsFields};
use super::{computed_bool, computed_object, computed_set, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Integration;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

/// Wire values of the integration types, in API order
pub const INTEGRATION_TYPES: &[&str] = &[
    "DIGITAL_OCEAN",
    "AMAZON",
    "SHOPIFY",
    "PUSHOVER",
    "RACKSPACE",
    "CLOUDFLARE",
    "NEW_RELIC",
    "SENTRY",
    "ROLLBAR",
    "DATADOG",
    "DO_SPACES",
    "HONEYBADGER",
    "VULTR",
    "SENTRY_ENTERPRISE",
    "LOGGLY",
    "FIREBASE",
    "UPCLOUD",
    "GHOST_INSPECTOR",
    "AZURE_CLOUD",
    "DOCKER_HUB",
    "GIT_HUB",
    "GIT_LAB",
    "STACK_HAWK",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntegrationFields {
    pub integration_id: Value<String>,
    pub name: Value<String>,
    pub identifier: Value<String>,
    pub kind: Value<String>,
    pub scope: Value<String>,
    pub html_url: Value<String>,
    pub project_name: Value<String>,
    pub all_pipelines_allowed: Value<bool>,
    pub allowed_pipelines: Value<Vec<AllowedPipelineFields>>,
    pub permissions: Value<PermissionsFields>,
}

impl IntegrationFields {
    pub fn load(dto: &Integration) -> Self {
        Self {
            integration_id: bridge::string(&dto.hash_id),
            name: bridge::string(&dto.name),
            identifier: bridge::string(&dto.identifier),
            kind: bridge::string(&dto.kind),
            scope: bridge::string(&dto.scope),
            html_url: bridge::string(&dto.html_url),
            project_name: bridge::opt_string(dto.project_name.as_deref()),
            all_pipelines_allowed: bridge::boolean(dto.all_pipelines_allowed),
            allowed_pipelines: bridge::object_set(&dto.allowed_pipelines, AllowedPipelineFields::load),
            permissions: PermissionsFields::load_opt(dto.permissions.as_ref(), PermissionFamily::Integration),
        }
    }
}

impl Fields for IntegrationFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("integration_id", computed_string("The integration's hash ID")),
            ("name", computed_string("The integration's name")),
            ("identifier", computed_string("The integration's identifier")),
            ("type", computed_string("The integration's type")),
            ("scope", computed_string("The integration's scope")),
            ("html_url", computed_string("The integration's URL")),
            ("project_name", computed_string("Project the integration is scoped to")),
            (
                "all_pipelines_allowed",
                computed_bool("Whether every pipeline may use the integration"),
            ),
            (
                "allowed_pipelines",
                computed_set::<AllowedPipelineFields>("Pipelines allowed to use the integration"),
            ),
            (
                "permissions",
                computed_object::<PermissionsFields>("Who may use the integration"),
            ),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            integration_id: r.string("integration_id"),
            name: r.string("name"),
            identifier: r.string("identifier"),
            kind: r.string("type"),
            scope: r.string("scope"),
            html_url: r.string("html_url"),
            project_name: r.string("project_name"),
            all_pipelines_allowed: r.bool("all_pipelines_allowed"),
            allowed_pipelines: r.set("allowed_pipelines"),
            permissions: r.object("permissions"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("integration_id", &self.integration_id)
            .string("name", &self.name)
            .string("identifier", &self.identifier)
            .string("type", &self.kind)
            .string("scope", &self.scope)
            .string("html_url", &self.html_url)
            .string("project_name", &self.project_name)
            .bool("all_pipelines_allowed", &self.all_pipelines_allowed)
            .set("allowed_pipelines", &self.allowed_pipelines)
            .object("permissions", &self.permissions)
    }
}

nested_object!(IntegrationFields);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buddy::models::{AllowedPipeline, ResourcePermissions};
    use crate::entities::testing::round_trip;

    #[test]
    fn test_load_round_trip() {
        let dto = Integration {
            hash_id: "abc123".to_string(),
            name: "aws".to_string(),
            kind: "AMAZON".to_string(),
            scope: "WORKSPACE".to_string(),
            allowed_pipelines: vec![AllowedPipeline {
                project: "web".to_string(),
                pipeline: "deploy".to_string(),
            }],
            permissions: Some(ResourcePermissions::default()),
            ..Default::default()
        };
        let fields = IntegrationFields::load(&dto);
        assert!(fields.project_name.is_null());
        assert_eq!(fields.permissions.value().others.as_str(), Some("DENIED"));
        assert_eq!(round_trip(&fields), fields);
    }
}
