//! Project members and project groups
//!
//! Membership in a project is read through the project-scoped endpoints,
//! which also return the permission the member or group holds there.

use super::{domain_attribute, id_attribute, list_id, project_name_attribute, regex_attribute, triple_id};
use crate::bridge;
use crate::buddy::models::{Group, Member};
use crate::buddy::BuddyApi;
use crate::entities::group::GroupFields;
use crate::entities::member::MemberFields;
use crate::entities::permission::PermissionFields;
use crate::entities::{computed_object, computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::ListFilter;
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

fn permission_attribute() -> (&'static str, Attribute) {
    (
        "permission",
        computed_object::<PermissionFields>("Permission held in the project"),
    )
}

/// `buddy_project_member`
pub struct ProjectMemberDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProjectMemberModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub member: MemberFields,
    pub permission: Value<PermissionFields>,
}

impl Record for ProjectMemberModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            member: MemberFields::read(&mut r),
            permission: r.object("permission"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.member
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain)
                    .string("project_name", &self.project_name),
            )
            .object("permission", &self.permission)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProjectMemberDataSource {
    type Model = ProjectMemberModel;
    type Dto = Member;

    const TYPE_NAME: &'static str = "buddy_project_member";

    fn schema() -> Schema {
        Schema::new("Get a project member and the permission they hold in the project")
            .attrs(MemberFields::attributes())
            .attrs([permission_attribute()])
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr(
                "member_id",
                Attribute::required(AttrType::Int64)
                    .describe("The member's ID")
                    .validate(Validator::AtLeast(1)),
            )
    }

    async fn fetch(api: &dyn BuddyApi, model: &ProjectMemberModel, diags: &mut Diagnostics) -> Option<Member> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let member_id = *diags.capture(model.member.member_id.require("member_id"))?;
        diags.capture(
            api.get_project_member(domain, project_name, member_id)
                .await
                .or_diagnostic("project member", "get project member"),
        )
    }

    fn map(mut model: ProjectMemberModel, dto: Member, _diags: &mut Diagnostics) -> ProjectMemberModel {
        model.id = triple_id(&model.domain, &model.project_name, &dto.id.to_string());
        model.member = MemberFields::load(&dto);
        model.permission = MemberFields::load_permission(&dto);
        model
    }
}

/// `buddy_project_members`
pub struct ProjectMembersDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProjectMembersModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub name_regex: Value<String>,
    pub members: Value<Vec<MemberFields>>,
}

impl Record for ProjectMembersModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            name_regex: r.string("name_regex"),
            members: r.set("members"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("project_name", &self.project_name)
            .string("name_regex", &self.name_regex)
            .set("members", &self.members)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProjectMembersDataSource {
    type Model = ProjectMembersModel;
    type Dto = Vec<Member>;

    const TYPE_NAME: &'static str = "buddy_project_members";

    fn schema() -> Schema {
        Schema::new("List project members and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr("name_regex", regex_attribute("The member's name regular expression to match"))
            .attr("members", computed_set::<MemberFields>("List of members"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &ProjectMembersModel, diags: &mut Diagnostics) -> Option<Vec<Member>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let all = diags.capture(
            api.get_project_members(domain, project_name)
                .await
                .or_diagnostic("project members", "get project members"),
        )?;
        let filter = diags.capture(ListFilter::new().regex(&model.name_regex, "name_regex", |m: &Member| {
            m.name.as_str()
        }))?;
        Some(filter.apply(all))
    }

    fn map(mut model: ProjectMembersModel, dtos: Vec<Member>, _diags: &mut Diagnostics) -> ProjectMembersModel {
        model.id = list_id();
        model.members = bridge::object_set(&dtos, MemberFields::load);
        model
    }
}

/// `buddy_project_group`
pub struct ProjectGroupDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProjectGroupModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub group: GroupFields,
    pub permission: Value<PermissionFields>,
}

impl Record for ProjectGroupModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            group: GroupFields::read(&mut r),
            permission: r.object("permission"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.group
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain)
                    .string("project_name", &self.project_name),
            )
            .object("permission", &self.permission)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProjectGroupDataSource {
    type Model = ProjectGroupModel;
    type Dto = Group;

    const TYPE_NAME: &'static str = "buddy_project_group";

    fn schema() -> Schema {
        Schema::new("Get a project group and the permission it holds in the project")
            .attrs(GroupFields::attributes())
            .attrs([permission_attribute()])
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr(
                "group_id",
                Attribute::required(AttrType::Int64)
                    .describe("The group's ID")
                    .validate(Validator::AtLeast(1)),
            )
    }

    async fn fetch(api: &dyn BuddyApi, model: &ProjectGroupModel, diags: &mut Diagnostics) -> Option<Group> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let group_id = *diags.capture(model.group.group_id.require("group_id"))?;
        diags.capture(
            api.get_project_group(domain, project_name, group_id)
                .await
                .or_diagnostic("project group", "get project group"),
        )
    }

    fn map(mut model: ProjectGroupModel, dto: Group, _diags: &mut Diagnostics) -> ProjectGroupModel {
        model.id = triple_id(&model.domain, &model.project_name, &dto.id.to_string());
        model.group = GroupFields::load(&dto);
        model.permission = GroupFields::load_permission(&dto);
        model
    }
}

/// `buddy_project_groups`
pub struct ProjectGroupsDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProjectGroupsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub project_name: Value<String>,
    pub name_regex: Value<String>,
    pub groups: Value<Vec<GroupFields>>,
}

impl Record for ProjectGroupsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            project_name: r.string("project_name"),
            name_regex: r.string("name_regex"),
            groups: r.set("groups"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("project_name", &self.project_name)
            .string("name_regex", &self.name_regex)
            .set("groups", &self.groups)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProjectGroupsDataSource {
    type Model = ProjectGroupsModel;
    type Dto = Vec<Group>;

    const TYPE_NAME: &'static str = "buddy_project_groups";

    fn schema() -> Schema {
        Schema::new("List project groups and optionally filter them by name")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("project_name", project_name_attribute())
            .attr("name_regex", regex_attribute("The group's name regular expression to match"))
            .attr("groups", computed_set::<GroupFields>("List of groups"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &ProjectGroupsModel, diags: &mut Diagnostics) -> Option<Vec<Group>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let project_name = diags.capture(model.project_name.require("project_name"))?;
        let all = diags.capture(
            api.get_project_groups(domain, project_name)
                .await
                .or_diagnostic("project groups", "get project groups"),
        )?;
        let filter = diags.capture(ListFilter::new().regex(&model.name_regex, "name_regex", |g: &Group| {
            g.name.as_str()
        }))?;
        Some(filter.apply(all))
    }

    fn map(mut model: ProjectGroupsModel, dtos: Vec<Group>, _diags: &mut Diagnostics) -> ProjectGroupsModel {
        model.id = list_id();
        model.groups = bridge::object_set(&dtos, GroupFields::load);
        model
    }
}
