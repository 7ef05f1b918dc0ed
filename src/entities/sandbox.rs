use super::{computed_set, computed_string, computed_strings, Fields};
use crate::bridge;
use crate::buddy::models::{Sandbox, SandboxEndpoint};
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SandboxEndpointFields {
    pub name: Value<String>,
    pub endpoint: Value<String>,
    pub kind: Value<String>,
    pub region: Value<String>,
}

impl SandboxEndpointFields {
    pub fn load(dto: &SandboxEndpoint) -> Self {
        Self {
            name: bridge::string(&dto.name),
            endpoint: bridge::string(&dto.endpoint),
            kind: bridge::string(&dto.kind),
            region: bridge::string(&dto.region),
        }
    }
}

impl Fields for SandboxEndpointFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("name", computed_string("Endpoint name")),
            ("endpoint", computed_string("Address exposed by the sandbox")),
            ("type", computed_string("Endpoint type: HTTP, TCP or TLS")),
            ("region", computed_string("Region the endpoint is served from")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            name: r.string("name"),
            endpoint: r.string("endpoint"),
            kind: r.string("type"),
            region: r.string("region"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("name", &self.name)
            .string("endpoint", &self.endpoint)
            .string("type", &self.kind)
            .string("region", &self.region)
    }
}

nested_object!(SandboxEndpointFields);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SandboxFields {
    pub sandbox_id: Value<String>,
    pub name: Value<String>,
    pub identifier: Value<String>,
    pub html_url: Value<String>,
    pub status: Value<String>,
    pub setup_status: Value<String>,
    pub app_status: Value<String>,
    pub os: Value<String>,
    pub resources: Value<String>,
    pub app_dir: Value<String>,
    pub app_type: Value<String>,
    pub run_command: Value<String>,
    pub install_commands: Value<String>,
    pub tags: Value<Vec<String>>,
    pub endpoints: Value<Vec<SandboxEndpointFields>>,
}

impl SandboxFields {
    pub fn load(dto: &Sandbox) -> Self {
        Self {
            sandbox_id: bridge::string(&dto.id),
            name: bridge::string(&dto.name),
            identifier: bridge::string(&dto.identifier),
            html_url: bridge::string(&dto.html_url),
            status: bridge::string(&dto.status),
            setup_status: bridge::string(&dto.setup_status),
            app_status: bridge::string(&dto.app_status),
            os: bridge::string(&dto.os),
            resources: bridge::string(&dto.resources),
            app_dir: bridge::string(&dto.app_dir),
            app_type: bridge::string(&dto.app_type),
            run_command: bridge::string(&dto.run_command),
            install_commands: bridge::string(&dto.install_commands),
            tags: bridge::string_set(&dto.tags),
            endpoints: bridge::object_set(&dto.endpoints, SandboxEndpointFields::load),
        }
    }
}

impl Fields for SandboxFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("sandbox_id", computed_string("The sandbox's ID")),
            ("name", computed_string("The sandbox's name")),
            ("identifier", computed_string("The sandbox's identifier")),
            ("html_url", computed_string("The sandbox's URL")),
            ("status", computed_string("The sandbox's status")),
            ("setup_status", computed_string("Status of the setup commands")),
            ("app_status", computed_string("Status of the application")),
            ("os", computed_string("The sandbox's operating system image")),
            ("resources", computed_string("The sandbox's resource class")),
            ("app_dir", computed_string("Application directory")),
            ("app_type", computed_string("Application type: CMD or SERVICE")),
            ("run_command", computed_string("Command that runs the application")),
            ("install_commands", computed_string("Commands run during setup")),
            ("tags", computed_strings("The sandbox's tags")),
            ("endpoints", computed_set::<SandboxEndpointFields>("Endpoints exposed by the sandbox")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            sandbox_id: r.string("sandbox_id"),
            name: r.string("name"),
            identifier: r.string("identifier"),
            html_url: r.string("html_url"),
            status: r.string("status"),
            setup_status: r.string("setup_status"),
            app_status: r.string("app_status"),
            os: r.string("os"),
            resources: r.string("resources"),
            app_dir: r.string("app_dir"),
            app_type: r.string("app_type"),
            run_command: r.string("run_command"),
            install_commands: r.string("install_commands"),
            tags: r.strings("tags"),
            endpoints: r.set("endpoints"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("sandbox_id", &self.sandbox_id)
            .string("name", &self.name)
            .string("identifier", &self.identifier)
            .string("html_url", &self.html_url)
            .string("status", &self.status)
            .string("setup_status", &self.setup_status)
            .string("app_status", &self.app_status)
            .string("os", &self.os)
            .string("resources", &self.resources)
            .string("app_dir", &self.app_dir)
            .string("app_type", &self.app_type)
            .string("run_command", &self.run_command)
            .string("install_commands", &self.install_commands)
            .strings("tags", &self.tags)
            .set("endpoints", &self.endpoints)
    }
}

nested_object!(SandboxFields);
