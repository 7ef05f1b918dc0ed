use super::{computed_bool, computed_int, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Workspace;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkspaceFields {
    pub workspace_id: Value<i64>,
    pub name: Value<String>,
    pub domain: Value<String>,
    pub html_url: Value<String>,
    pub owner_id: Value<i64>,
    pub frozen: Value<bool>,
    pub create_date: Value<String>,
}

impl WorkspaceFields {
    pub fn load(dto: &Workspace) -> Self {
        Self {
            workspace_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            domain: bridge::string(&dto.domain),
            html_url: bridge::string(&dto.html_url),
            owner_id: bridge::int64(dto.owner_id),
            frozen: bridge::boolean(dto.frozen),
            create_date: bridge::string(&dto.create_date),
        }
    }
}

impl Fields for WorkspaceFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("workspace_id", computed_int("The workspace's ID")),
            ("name", computed_string("The workspace's name")),
            ("domain", computed_string("The workspace's URL handle")),
            ("html_url", computed_string("The workspace's URL")),
            ("owner_id", computed_int("The workspace owner's member ID")),
            ("frozen", computed_bool("Whether the workspace is frozen")),
            ("create_date", computed_string("The workspace's creation date")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            workspace_id: r.int64("workspace_id"),
            name: r.string("name"),
            domain: r.string("domain"),
            html_url: r.string("html_url"),
            owner_id: r.int64("owner_id"),
            frozen: r.bool("frozen"),
            create_date: r.string("create_date"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("workspace_id", &self.workspace_id)
            .string("name", &self.name)
            .string("domain", &self.domain)
            .string("html_url", &self.html_url)
            .int64("owner_id", &self.owner_id)
            .bool("frozen", &self.frozen)
            .string("create_date", &self.create_date)
    }
}

nested_object!(WorkspaceFields);
