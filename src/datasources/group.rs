use super::{domain_attribute, double_id, id_attribute, id_selector, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::{Group, Member};
use crate::buddy::BuddyApi;
use crate::entities::group::GroupFields;
use crate::entities::member::MemberFields;
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// `buddy_group`
pub struct GroupDataSource;

#[derive(Debug, Clone, Default)]
pub struct GroupModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub group: GroupFields,
}

impl Record for GroupModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            group: GroupFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.group
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for GroupDataSource {
    type Model = GroupModel;
    type Dto = Group;

    const TYPE_NAME: &'static str = "buddy_group";

    fn schema() -> Schema {
        Schema::new("Get a group by name or group ID")
            .attrs(GroupFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("group_id", id_selector("The group's ID"))
            .attr("name", selector(AttrType::String, "The group's name"))
            .exactly_one_of(&["group_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &GroupModel, diags: &mut Diagnostics) -> Option<Group> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(&model.group.group_id, &model.group.name, ["group_id", "name"]);
        let result = match selected {
            Ok(Selector::Id(group_id)) => api
                .get_group(domain, group_id)
                .await
                .or_diagnostic("group", "get group"),
            Ok(Selector::Key(name)) => api
                .get_groups(domain)
                .await
                .or_diagnostic("group", "get groups")
                .and_then(|all| first_match(all, "group", |g| g.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: GroupModel, dto: Group, _diags: &mut Diagnostics) -> GroupModel {
        model.id = double_id(&model.domain, &dto.id.to_string());
        model.group = GroupFields::load(&dto);
        model
    }
}

/// `buddy_groups`
pub struct GroupsDataSource;

#[derive(Debug, Clone, Default)]
pub struct GroupsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub name_regex: Value<String>,
    pub groups: Value<Vec<GroupFields>>,
}

impl Record for GroupsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            name_regex: r.string("name_regex"),
            groups: r.set("groups"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("name_regex", &self.name_regex)
            .set("groups", &self.groups)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for GroupsDataSource {
    type Model = GroupsModel;
    type Dto = Vec<Group>;

    const TYPE_NAME: &'static str = "buddy_groups";

    fn schema() -> Schema {
        Schema::new("List groups and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("name_regex", regex_attribute("The group's name regular expression to match"))
            .attr("groups", computed_set::<GroupFields>("List of groups"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &GroupsModel, diags: &mut Diagnostics) -> Option<Vec<Group>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(api.get_groups(domain).await.or_diagnostic("groups", "get groups"))?;
        let filter = diags.capture(ListFilter::new().regex(&model.name_regex, "name_regex", |g: &Group| {
            g.name.as_str()
        }))?;
        Some(filter.apply(all))
    }

    fn map(mut model: GroupsModel, dtos: Vec<Group>, _diags: &mut Diagnostics) -> GroupsModel {
        model.id = list_id();
        model.groups = bridge::object_set(&dtos, GroupFields::load);
        model
    }
}

/// `buddy_group_members`
pub struct GroupMembersDataSource;

#[derive(Debug, Clone, Default)]
pub struct GroupMembersModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub group_id: Value<i64>,
    pub name_regex: Value<String>,
    pub members: Value<Vec<MemberFields>>,
}

impl Record for GroupMembersModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            group_id: r.int64("group_id"),
            name_regex: r.string("name_regex"),
            members: r.set("members"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .int64("group_id", &self.group_id)
            .string("name_regex", &self.name_regex)
            .set("members", &self.members)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for GroupMembersDataSource {
    type Model = GroupMembersModel;
    type Dto = Vec<Member>;

    const TYPE_NAME: &'static str = "buddy_group_members";

    fn schema() -> Schema {
        Schema::new("List members of a group and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "group_id",
                Attribute::required(AttrType::Int64)
                    .describe("The group's ID")
                    .validate(Validator::AtLeast(1)),
            )
            .attr("name_regex", regex_attribute("The member's name regular expression to match"))
            .attr("members", computed_set::<MemberFields>("List of members"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &GroupMembersModel, diags: &mut Diagnostics) -> Option<Vec<Member>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let group_id = *diags.capture(model.group_id.require("group_id"))?;
        let all = diags.capture(
            api.get_group_members(domain, group_id)
                .await
                .or_diagnostic("group members", "get group members"),
        )?;
        let filter = diags.capture(ListFilter::new().regex(&model.name_regex, "name_regex", |m: &Member| {
            m.name.as_str()
        }))?;
        Some(filter.apply(all))
    }

    fn map(mut model: GroupMembersModel, dtos: Vec<Member>, _diags: &mut Diagnostics) -> GroupMembersModel {
        model.id = list_id();
        model.members = bridge::object_set(&dtos, MemberFields::load);
        model
    }
}
