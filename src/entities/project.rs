use super::{computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Project;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

pub const PROJECT_STATUSES: &[&str] = &["ACTIVE", "CLOSED"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectFields {
    pub name: Value<String>,
    pub display_name: Value<String>,
    pub status: Value<String>,
    pub html_url: Value<String>,
    pub create_date: Value<String>,
    pub access: Value<String>,
    pub default_branch: Value<String>,
}

impl ProjectFields {
    pub fn load(dto: &Project) -> Self {
        Self {
            name: bridge::string(&dto.name),
            display_name: bridge::string(&dto.display_name),
            status: bridge::string(&dto.status),
            html_url: bridge::string(&dto.html_url),
            create_date: bridge::string(&dto.create_date),
            access: bridge::string(&dto.access),
            default_branch: bridge::string(&dto.default_branch),
        }
    }
}

impl Fields for ProjectFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("name", computed_string("The project's unique name, used in URLs")),
            ("display_name", computed_string("The project's display name")),
            ("status", computed_string("The project's status: ACTIVE or CLOSED")),
            ("html_url", computed_string("The project's URL")),
            ("create_date", computed_string("The project's creation date")),
            ("access", computed_string("The project's access: PRIVATE or PUBLIC")),
            ("default_branch", computed_string("The repository's default branch")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            name: r.string("name"),
            display_name: r.string("display_name"),
            status: r.string("status"),
            html_url: r.string("html_url"),
            create_date: r.string("create_date"),
            access: r.string("access"),
            default_branch: r.string("default_branch"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("name", &self.name)
            .string("display_name", &self.display_name)
            .string("status", &self.status)
            .string("html_url", &self.html_url)
            .string("create_date", &self.create_date)
            .string("access", &self.access)
            .string("default_branch", &self.default_branch)
    }
}

nested_object!(ProjectFields);
