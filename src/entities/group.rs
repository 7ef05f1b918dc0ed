use super::permission::PermissionFields;
use super::{computed_bool, computed_int, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Group;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupFields {
    pub group_id: Value<i64>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub html_url: Value<String>,
    pub auto_assign_to_new_projects: Value<bool>,
    pub auto_assign_permission_set_id: Value<i64>,
}

impl GroupFields {
    pub fn load(dto: &Group) -> Self {
        Self {
            group_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            description: bridge::string(&dto.description),
            html_url: bridge::string(&dto.html_url),
            auto_assign_to_new_projects: bridge::boolean(dto.auto_assign_to_new_projects),
            auto_assign_permission_set_id: bridge::opt_int64(dto.auto_assign_permission_set_id),
        }
    }

    /// Permission the group holds in a project; only project-scoped reads carry it
    pub fn load_permission(dto: &Group) -> Value<PermissionFields> {
        bridge::opt_object(dto.permission_set.as_ref(), PermissionFields::load)
    }
}

impl Fields for GroupFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("group_id", computed_int("The group's ID")),
            ("name", computed_string("The group's name")),
            ("description", computed_string("The group's description")),
            ("html_url", computed_string("The group's URL")),
            (
                "auto_assign_to_new_projects",
                computed_bool("Whether the group is added to new projects"),
            ),
            (
                "auto_assign_permission_set_id",
                computed_int("Permission granted when the group is added to new projects"),
            ),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            group_id: r.int64("group_id"),
            name: r.string("name"),
            description: r.string("description"),
            html_url: r.string("html_url"),
            auto_assign_to_new_projects: r.bool("auto_assign_to_new_projects"),
            auto_assign_permission_set_id: r.int64("auto_assign_permission_set_id"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("group_id", &self.group_id)
            .string("name", &self.name)
            .string("description", &self.description)
            .string("html_url", &self.html_url)
            .bool("auto_assign_to_new_projects", &self.auto_assign_to_new_projects)
            .int64("auto_assign_permission_set_id", &self.auto_assign_permission_set_id)
    }
}

nested_object!(GroupFields);
