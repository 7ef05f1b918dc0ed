use super::{computed_int, computed_string, Fields};
use crate::bridge;
use crate::buddy::models::Profile;
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

/// The authenticated member
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileFields {
    pub member_id: Value<i64>,
    pub name: Value<String>,
    pub title: Value<String>,
    pub avatar_url: Value<String>,
    pub html_url: Value<String>,
}

impl ProfileFields {
    pub fn load(dto: &Profile) -> Self {
        Self {
            member_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            title: bridge::string(&dto.title),
            avatar_url: bridge::string(&dto.avatar_url),
            html_url: bridge::string(&dto.html_url),
        }
    }
}

impl Fields for ProfileFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("member_id", computed_int("The member's ID")),
            ("name", computed_string("The member's name")),
            ("title", computed_string("The member's title")),
            ("avatar_url", computed_string("The member's avatar URL")),
            ("html_url", computed_string("The member's URL")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            member_id: r.int64("member_id"),
            name: r.string("name"),
            title: r.string("title"),
            avatar_url: r.string("avatar_url"),
            html_url: r.string("html_url"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("member_id", &self.member_id)
            .string("name", &self.name)
            .string("title", &self.title)
            .string("avatar_url", &self.avatar_url)
            .string("html_url", &self.html_url)
    }
}
