use super::{domain_attribute, double_id, id_attribute, id_selector, list_id, regex_attribute, selector};
use crate::bridge;
use crate::buddy::models::Permission;
use crate::buddy::BuddyApi;
use crate::entities::permission::{PermissionFields, PERMISSION_TYPES};
use crate::entities::{computed_set, Fields};
use crate::errors::ApiResultExt;
use crate::filter::{first_match, ListFilter, Selector};
use crate::framework::{
    AttrPath, AttrType, Attribute, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue,
    Value,
};
use crate::validators::Validator;
use async_trait::async_trait;

/// `buddy_permission`
pub struct PermissionDataSource;

#[derive(Debug, Clone, Default)]
pub struct PermissionModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub permission: PermissionFields,
}

impl Record for PermissionModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            permission: PermissionFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.permission
            .write(
                ObjectBuilder::new(path)
                    .string("id", &self.id)
                    .string("domain", &self.domain),
            )
            .finish()
    }
}

#[async_trait]
impl ReadSpec for PermissionDataSource {
    type Model = PermissionModel;
    type Dto = Permission;

    const TYPE_NAME: &'static str = "buddy_permission";

    fn schema() -> Schema {
        Schema::new("Get a permission by name or permission ID")
            .attrs(PermissionFields::attributes())
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr("permission_id", id_selector("The permission's ID"))
            .attr("name", selector(AttrType::String, "The permission's name"))
            .exactly_one_of(&["permission_id", "name"])
    }

    async fn fetch(api: &dyn BuddyApi, model: &PermissionModel, diags: &mut Diagnostics) -> Option<Permission> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let selected = Selector::require(
            &model.permission.permission_id,
            &model.permission.name,
            ["permission_id", "name"],
        );
        let result = match selected {
            Ok(Selector::Id(permission_id)) => api
                .get_permission(domain, permission_id)
                .await
                .or_diagnostic("permission", "get permission"),
            Ok(Selector::Key(name)) => api
                .get_permissions(domain)
                .await
                .or_diagnostic("permission", "get permissions")
                .and_then(|all| first_match(all, "permission", |p| p.name == name)),
            Err(diag) => Err(diag),
        };
        diags.capture(result)
    }

    fn map(mut model: PermissionModel, dto: Permission, _diags: &mut Diagnostics) -> PermissionModel {
        model.id = double_id(&model.domain, &dto.id.to_string());
        model.permission = PermissionFields::load(&dto);
        model
    }
}

/// `buddy_permissions`
pub struct PermissionsDataSource;

#[derive(Debug, Clone, Default)]
pub struct PermissionsModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub name_regex: Value<String>,
    pub kind: Value<String>,
    pub permissions: Value<Vec<PermissionFields>>,
}

impl Record for PermissionsModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            name_regex: r.string("name_regex"),
            kind: r.string("type"),
            permissions: r.set("permissions"),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain)
            .string("name_regex", &self.name_regex)
            .string("type", &self.kind)
            .set("permissions", &self.permissions)
            .finish()
    }
}

#[async_trait]
impl ReadSpec for PermissionsDataSource {
    type Model = PermissionsModel;
    type Dto = Vec<Permission>;

    const TYPE_NAME: &'static str = "buddy_permissions";

    fn schema() -> Schema {
        Schema::new("List permissions and optionally filter them by name or type")
            .attr("id", id_attribute())
            .attr("domain", domain_attribute())
            .attr(
                "name_regex",
                regex_attribute("The permission's name regular expression to match"),
            )
            .attr(
                "type",
                Attribute::optional(AttrType::String)
                    .describe("Get only permissions of this type")
                    .validate(Validator::OneOf(PERMISSION_TYPES)),
            )
            .attr("permissions", computed_set::<PermissionFields>("List of permissions"))
    }

    async fn fetch(api: &dyn BuddyApi, model: &PermissionsModel, diags: &mut Diagnostics) -> Option<Vec<Permission>> {
        let domain = diags.capture(model.domain.require("domain"))?;
        let all = diags.capture(
            api.get_permissions(domain)
                .await
                .or_diagnostic("permissions", "get permissions"),
        )?;
        let filter = diags.capture(
            ListFilter::new().regex(&model.name_regex, "name_regex", |p: &Permission| p.name.as_str()),
        )?;
        let filter = filter.equals(&model.kind, |p: &Permission| p.kind.as_str());
        Some(filter.apply(all))
    }

    fn map(mut model: PermissionsModel, dtos: Vec<Permission>, _diags: &mut Diagnostics) -> PermissionsModel {
        model.id = list_id();
        model.permissions = bridge::object_set(&dtos, PermissionFields::load);
        model
    }
}
