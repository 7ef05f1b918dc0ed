use super::permission::PermissionFields;
use super::{computed_bool, computed_int, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Member;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberFields {
    pub member_id: Value<i64>,
    pub name: Value<String>,
    pub email: Value<String>,
    pub html_url: Value<String>,
    pub avatar_url: Value<String>,
    pub admin: Value<bool>,
    pub workspace_owner: Value<bool>,
    pub auto_assign_to_new_projects: Value<bool>,
    pub auto_assign_permission_set_id: Value<i64>,
}

impl MemberFields {
    pub fn load(dto: &Member) -> Self {
        Self {
            member_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            email: bridge::string(&dto.email),
            html_url: bridge::string(&dto.html_url),
            avatar_url: bridge::string(&dto.avatar_url),
            admin: bridge::boolean(dto.admin),
            workspace_owner: bridge::boolean(dto.workspace_owner),
            auto_assign_to_new_projects: bridge::boolean(dto.auto_assign_to_new_projects),
            auto_assign_permission_set_id: bridge::opt_int64(dto.auto_assign_permission_set_id),
        }
    }

    pub fn load_permission(dto: &Member) -> Value<PermissionFields> {
        bridge::opt_object(dto.permission_set.as_ref(), PermissionFields::load)
    }
}

impl Fields for MemberFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("member_id", computed_int("The member's ID")),
            ("name", computed_string("The member's name")),
            ("email", computed_string("The member's email")),
            ("html_url", computed_string("The member's URL")),
            ("avatar_url", computed_string("The member's avatar URL")),
            ("admin", computed_bool("Whether the member is a workspace administrator")),
            ("workspace_owner", computed_bool("Whether the member owns the workspace")),
            (
                "auto_assign_to_new_projects",
                computed_bool("Whether the member is added to new projects"),
            ),
            (
                "auto_assign_permission_set_id",
                computed_int("Permission granted when the member is added to new projects"),
            ),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            member_id: r.int64("member_id"),
            name: r.string("name"),
            email: r.string("email"),
            html_url: r.string("html_url"),
            avatar_url: r.string("avatar_url"),
            admin: r.bool("admin"),
            workspace_owner: r.bool("workspace_owner"),
            auto_assign_to_new_projects: r.bool("auto_assign_to_new_projects"),
            auto_assign_permission_set_id: r.int64("auto_assign_permission_set_id"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("member_id", &self.member_id)
            .string("name", &self.name)
            .string("email", &self.email)
            .string("html_url", &self.html_url)
            .string("avatar_url", &self.avatar_url)
            .bool("admin", &self.admin)
            .bool("workspace_owner", &self.workspace_owner)
            .bool("auto_assign_to_new_projects", &self.auto_assign_to_new_projects)
            .int64("auto_assign_permission_set_id", &self.auto_assign_permission_set_id)
    }
}

nested_object!(MemberFields);
