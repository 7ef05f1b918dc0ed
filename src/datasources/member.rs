use super::{domain_attribute, double_id, id_attribute, id_selector, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Member;
use crate::buddy::BuddyApi;
use crate::entities::member::MemberFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter};
use crate::framework::{
    AttrPath, AttrType, Diagnostic, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// `buddy_member`
pub struct MemberDataSource;

#[derive(Debug, Clone, Default)]
pub struct MemberModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub member: MemberFields,
}

impl MemberModel {
    /// A listed member matches when its name or its email equals the configured one
    fn matches(&self, member: &Member) -> bool {
        let by_name = self.member.name.as_str() == Some(member.name.as_str());
        let by_email = self.member.email.as_str() == Some(member.email.as_str());
        by_name || by_email
    }
}

impl Record for MemberModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            member: MemberFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.member
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for MemberDataSource {
    type Model = MemberModel;
    type Dto = Member;

    const TYPE_NAME: &'static str = "buddy_member";

    fn schema() -> Schema {
        Schema::new("Get a member by ID, name or email")
            .attrs(MemberFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("member_id", id_selector("The member's ID"))
            .attr("name", selector(AttrType::String, "The member's name"))
            .attr(
                "email",
                selector(AttrType::String, "The member's email").validate(Validator::Email),
            )
            .exactly_one_of(&["member_id", "name", "email"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &MemberModel, diags: &mut Diagnostics) -> Option<Member> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let result = if let Some(member_id) = model.member.member_id.get() {
            api.get_member(domain, member_id)
                .await
                .or_diagnostic("member", "get member")
        } else if model.member.name.is_known() || model.member.email.is_known() {
            api.get_members(domain)
                .await
                .or_diagnostic("member", "get members")
                .and_then(|all| first_match(all, "member", |m| model.matches(m)))
        } else {
            Err(Diagnostic::attribute(
                AttrPath::root("member_id"),
                "Invalid Attribute Combination",
                "One of [member_id,name,email] must be set to a known value",
            ))
        };
        diags.capture(result)
    }

    fn map(mut model: MemberModel, dto: Member, _diags: &mut Diagnostics) -> MemberModel {
        model.id = double_id(&model.domain, &dto.id.to_string());
        model.member = MemberFields::load(&dto);
        model
    }
}

/// `buddy_members`
pub struct MembersDataSource;

#[derive(Debug, Clone, Default)]
pub struct MembersModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub name_regex: Value<String>,
    pub members: Value<Vec<MemberFields>>,
}

impl Record for MembersModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            name_regex: r.string("name_regex"),
            members: r.set("members"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("name_regex", &self.name_regex)
            .set("members", &self.members)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for MembersDataSource {
    type Model = MembersModel;
    type Dto = Vec<Member>;

    const TYPE_NAME: &'static str = "buddy_members";

    fn schema() -> Schema {
        Schema::new("List workspace members and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("name_regex", regex_attribute("The member's name regular expression to match"))
            .attr("members", computed_set::<MemberFields>("List of members"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &MembersModel, diags: &mut Diagnostics) -> Option<Vec<Member>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(api.get_members(domain).await.or_diagnostic("members", "get members"))?;
        let filter = diags.capture(ListFilter::new().regex(&model.name_regex, "name_regex", |m: &Member| {
            m.name.as_str()
        }))?;
        Some(filter.apply(all))
    }

    fn map(mut model: MembersModel, dtos: Vec<Member>, _diags: &mut Diagnostics) -> MembersModel {
        model.id = list_id();
        model.members = bridge::object_set(&dtos, MemberFields::load);
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, email: &str) -> Member {
        Member {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_either_name_or_email_matches() {
        let model = MemberModel {
            member: MemberFields {
                name: "Jane".into(),
                email: "john@acme.io".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(model.matches(&member("Jane", "jane@acme.io")));
        assert!(model.matches(&member("John", "john@acme.io")));
        assert!(!model.matches(&member("Bob", "bob@acme.io")));
    }

    #[test]
    fn test_null_selectors_never_match_empty_fields() {
        let model = MemberModel::default();
        assert!(!model.matches(&member("", "")));
    }
}
