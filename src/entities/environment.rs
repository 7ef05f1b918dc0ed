use super::common::{AllowedPipelineFields, PermissionFamily, PermissionsFields};
use super::{computed_bool, computed_object, computed_set, computed_string, computed_strings, Fields};
use crate::bridge;
use crate::buddy::models::Environment;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvironmentFields {
    pub environment_id: Value<String>,
    pub name: Value<String>,
    pub identifier: Value<String>,
    pub kind: Value<String>,
    pub scope: Value<String>,
    pub html_url: Value<String>,
    pub public_url: Value<String>,
    pub tags: Value<Vec<String>>,
    pub all_pipelines_allowed: Value<bool>,
    pub allowed_pipelines: Value<Vec<AllowedPipelineFields>>,
    pub permissions: Value<PermissionsFields>,
}

impl EnvironmentFields {
    pub fn load(dto: &Environment) -> Self {
        Self {
            environment_id: bridge::string(&dto.id),
            name: bridge::string(&dto.name),
            identifier: bridge::string(&dto.identifier),
            kind: bridge::string(&dto.kind),
            scope: bridge::string(&dto.scope),
            html_url: bridge::string(&dto.html_url),
            public_url: bridge::string(&dto.public_url),
            tags: bridge::string_set(&dto.tags),
            all_pipelines_allowed: bridge::boolean(dto.all_pipelines_allowed),
            allowed_pipelines: bridge::object_set(&dto.allowed_pipelines, AllowedPipelineFields::load),
            permissions: PermissionsFields::load_opt(dto.permissions.as_ref(), PermissionFamily::Environment),
        }
    }
}

impl Fields for EnvironmentFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("environment_id", computed_string("The environment's ID")),
            ("name", computed_string("The environment's name")),
            ("identifier", computed_string("The environment's identifier")),
            ("type", computed_string("The environment's type")),
            ("scope", computed_string("The environment's scope")),
            ("html_url", computed_string("The environment's URL")),
            ("public_url", computed_string("The environment's public URL")),
            ("tags", computed_strings("The environment's tags")),
            (
                "all_pipelines_allowed",
                computed_bool("Whether every pipeline may use the environment"),
            ),
            (
                "allowed_pipelines",
                computed_set::<AllowedPipelineFields>("Pipelines allowed to use the environment"),
            ),
            (
                "permissions",
                computed_object::<PermissionsFields>("Who may use the environment"),
            ),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            environment_id: r.string("environment_id"),
            name: r.string("name"),
            identifier: r.string("identifier"),
            kind: r.string("type"),
            scope: r.string("scope"),
            html_url: r.string("html_url"),
            public_url: r.string("public_url"),
            tags: r.strings("tags"),
            all_pipelines_allowed: r.bool("all_pipelines_allowed"),
            allowed_pipelines: r.set("allowed_pipelines"),
            permissions: r.object("permissions"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("environment_id", &self.environment_id)
            .string("name", &self.name)
            .string("identifier", &self.identifier)
            .string("type", &self.kind)
            .string("scope", &self.scope)
            .string("html_url", &self.html_url)
            .string("public_url", &self.public_url)
            .strings("tags", &self.tags)
            .bool("all_pipelines_allowed", &self.all_pipelines_allowed)
            .set("allowed_pipelines", &self.allowed_pipelines)
            .object("permissions", &self.permissions)
    }
}

nested_object!(EnvironmentFields);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buddy::models::ResourcePermissions;
    use crate::entities::testing::round_trip;

    #[test]
    fn test_load_round_trip() {
        let dto = Environment {
            id: "env1".to_string(),
            name: "staging".to_string(),
            tags: vec!["eu".to_string(), "eu".to_string()],
            permissions: Some(ResourcePermissions::default()),
            ..Default::default()
        };
        let fields = EnvironmentFields::load(&dto);
        assert_eq!(fields.permissions.value().others.as_str(), Some("USE_ONLY"));
        let back = round_trip(&fields);
        assert_eq!(back.tags, Value::Known(vec!["eu".to_string()]));
    }
}
