use super::common::{AllowedPipelineFields, PermissionFamily, PermissionsFields};
use super::{computed_bool, computed_object, computed_set, computed_string, computed_strings, Fields};
use crate::bridge;
use crate::buddy::models::{Target, TargetAuth, TargetProxy};
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

/// How the target authenticates; secrets are never returned
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetAuthFields {
    pub method: Value<String>,
    pub username: Value<String>,
    pub asset: Value<String>,
}

impl TargetAuthFields {
    pub fn load(dto: &TargetAuth) -> Self {
        Self {
            method: bridge::string(&dto.method),
            username: bridge::string(&dto.username),
            asset: bridge::string(&dto.asset),
        }
    }
}

impl Fields for TargetAuthFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("method", computed_string("Authentication method")),
            ("username", computed_string("User name")),
            ("asset", computed_string("Asset holding the key")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            method: r.string("method"),
            username: r.string("username"),
            asset: r.string("asset"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("method", &self.method)
            .string("username", &self.username)
            .string("asset", &self.asset)
    }
}

nested_object!(TargetAuthFields);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetProxyFields {
    pub name: Value<String>,
    pub host: Value<String>,
    pub port: Value<String>,
    pub auth: Value<TargetAuthFields>,
}

impl TargetProxyFields {
    pub fn load(dto: &TargetProxy) -> Self {
        Self {
            name: bridge::string(&dto.name),
            host: bridge::string(&dto.host),
            port: bridge::string(&dto.port),
            auth: bridge::opt_object(dto.auth.as_ref(), TargetAuthFields::load),
        }
    }
}

impl Fields for TargetProxyFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("name", computed_string("Proxy name")),
            ("host", computed_string("Proxy host")),
            ("port", computed_string("Proxy port")),
            ("auth", computed_object::<TargetAuthFields>("Proxy authentication")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            name: r.string("name"),
            host: r.string("host"),
            port: r.string("port"),
            auth: r.object("auth"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("name", &self.name)
            .string("host", &self.host)
            .string("port", &self.port)
            .object("auth", &self.auth)
    }
}

nested_object!(TargetProxyFields);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetFields {
    pub target_id: Value<String>,
    pub name: Value<String>,
    pub identifier: Value<String>,
    pub kind: Value<String>,
    pub html_url: Value<String>,
    pub host: Value<String>,
    pub port: Value<String>,
    pub path: Value<String>,
    pub secure: Value<bool>,
    pub disabled: Value<bool>,
    pub tags: Value<Vec<String>>,
    pub auth: Value<TargetAuthFields>,
    pub proxy: Value<TargetProxyFields>,
    pub all_pipelines_allowed: Value<bool>,
    pub allowed_pipelines: Value<Vec<AllowedPipelineFields>>,
    pub permissions: Value<PermissionsFields>,
}

impl TargetFields {
    pub fn load(dto: &Target) -> Self {
        Self {
            target_id: bridge::string(&dto.id),
            name: bridge::string(&dto.name),
            identifier: bridge::string(&dto.identifier),
            kind: bridge::string(&dto.kind),
            html_url: bridge::string(&dto.html_url),
            host: bridge::string(&dto.host),
            port: bridge::string(&dto.port),
            path: bridge::string(&dto.path),
            secure: bridge::boolean(dto.secure),
            disabled: bridge::boolean(dto.disabled),
            tags: bridge::string_set(&dto.tags),
            auth: bridge::opt_object(dto.auth.as_ref(), TargetAuthFields::load),
            proxy: bridge::opt_object(dto.proxy.as_ref(), TargetProxyFields::load),
            all_pipelines_allowed: bridge::boolean(dto.all_pipelines_allowed),
            allowed_pipelines: bridge::object_set(&dto.allowed_pipelines, AllowedPipelineFields::load),
            permissions: PermissionsFields::load_opt(dto.permissions.as_ref(), PermissionFamily::Target),
        }
    }
}

impl Fields for TargetFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("target_id", computed_string("The target's ID")),
            ("name", computed_string("The target's name")),
            ("identifier", computed_string("The target's identifier")),
            ("type", computed_string("The target's type")),
            ("html_url", computed_string("The target's URL")),
            ("host", computed_string("The target's host")),
            ("port", computed_string("The target's port")),
            ("path", computed_string("The target's path")),
            ("secure", computed_bool("Whether the connection is secured")),
            ("disabled", computed_bool("Whether the target is disabled")),
            ("tags", computed_strings("The target's tags")),
            ("auth", computed_object::<TargetAuthFields>("The target's authentication")),
            ("proxy", computed_object::<TargetProxyFields>("Proxy used to reach the target")),
            (
                "all_pipelines_allowed",
                computed_bool("Whether every pipeline may use the target"),
            ),
            (
                "allowed_pipelines",
                computed_set::<AllowedPipelineFields>("Pipelines allowed to use the target"),
            ),
            ("permissions", computed_object::<PermissionsFields>("Who may use the target")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            target_id: r.string("target_id"),
            name: r.string("name"),
            identifier: r.string("identifier"),
            kind: r.string("type"),
            html_url: r.string("html_url"),
            host: r.string("host"),
            port: r.string("port"),
            path: r.string("path"),
            secure: r.bool("secure"),
            disabled: r.bool("disabled"),
            tags: r.strings("tags"),
            auth: r.object("auth"),
            proxy: r.object("proxy"),
            all_pipelines_allowed: r.bool("all_pipelines_allowed"),
            allowed_pipelines: r.set("allowed_pipelines"),
            permissions: r.object("permissions"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("target_id", &self.target_id)
            .string("name", &self.name)
            .string("identifier", &self.identifier)
            .string("type", &self.kind)
            .string("html_url", &self.html_url)
            .string("host", &self.host)
            .string("port", &self.port)
            .string("path", &self.path)
            .bool("secure", &self.secure)
            .bool("disabled", &self.disabled)
            .strings("tags", &self.tags)
            .object("auth", &self.auth)
            .object("proxy", &self.proxy)
            .bool("all_pipelines_allowed", &self.all_pipelines_allowed)
            .set("allowed_pipelines", &self.allowed_pipelines)
            .object("permissions", &self.permissions)
    }
}

nested_object!(TargetFields);
