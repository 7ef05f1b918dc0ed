//! Variables and SSH keys
//!
//! Both data sources read from the same endpoints and differ only in
//! the variable type they accept. A lookup by key skips entries of the
//! other type; a lookup by ID that lands on the other type is reported
//! as not found.

use super::{domain_attribute, double_id, id_attribute, id_selector, selector};
use crate::buddy::models::Variable;
use crate::buddy::BuddyApi;
use crate::entities::variable::{SshKeyFields, VariableFields, VariableKind, VariableScope};
use crate::entities::Fields;
use crate::errors::ApiResultExt;
use crate::filter::{first_match, Selector};
use crate::framework::{
    AttrPath, AttrType, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue, Value,
};
use async_trait::async_trait;

fn variable_schema(description: &'static str) -> Schema {
    Schema::new(description)
        .attrs(VariableFields::attributes())
        .attrs(VariableScope::attributes())
        .attr("id", id_attribute())
        .attr("domain", domain_attribute())
        .attr("variable_id", id_selector("The variable's ID"))
        .attr("key", selector(AttrType::String, "The variable's key"))
        .exactly_one_of(&["variable_id", "key"])
}

async fn fetch_variable(
    api: &dyn BuddyApi,
    domain: &Value<String>,
    scope: &VariableScope,
    variable: &VariableFields,
    kind: VariableKind,
    diags: &mut Diagnostics,
) -> Option<Variable> {
    let domain = diags.capture(domain.require("domain"))?;
    let selected = Selector::require(&variable.variable_id, &variable.key, ["variable_id", "key"]);
    let result = match selected {
        Ok(Selector::Id(variable_id)) => api
            .get_variable(domain, variable_id)
            .await
            .or_diagnostic(kind.entity(), "get variable"),
        Ok(Selector::Key(key)) => api
            .get_variables(domain, &scope.query())
            .await
            .or_diagnostic(kind.entity(), "get variables")
            .and_then(|all| first_match(all, kind.entity(), |v| kind.matches(v) && v.key == key)),
        Err(diag) => Err(diag),
    };
    diags.capture(result)
}

/// `buddy_variable`
pub struct VariableDataSource;

#[derive(Debug, Clone, Default)]
pub struct VariableModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub scope: VariableScope,
    pub variable: VariableFields,
}

impl Record for VariableModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            scope: VariableScope::read(&mut r),
            variable: VariableFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        let builder = ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain);
        self.variable.write(self.scope.write(builder)).finish()
    }
}

#[async_trait]
impl ReadSpec for VariableDataSource {
    type Model = VariableModel;
    type Dto = Variable;

    const TYPE_NAME: &'static str = "buddy_variable";

    fn schema() -> Schema {
        variable_schema("Get a variable by key or variable ID")
    }

    async fn fetch(api: &dyn BuddyApi, model: &VariableModel, diags: &mut Diagnostics) -> Option<Variable> {
        fetch_variable(api, &model.domain, &model.scope, &model.variable, VariableKind::Var, diags).await
    }

    fn map(mut model: VariableModel, dto: Variable, diags: &mut Diagnostics) -> VariableModel {
        if let Some(variable) = diags.capture(VariableFields::load(&dto, VariableKind::Var)) {
            model.id = double_id(&model.domain, &dto.id.to_string());
            model.scope = VariableScope::resolve(&dto, &model.scope);
            model.variable = variable;
        }
        model
    }
}

/// `buddy_variable_ssh_key`
pub struct VariableSshKeyDataSource;

#[derive(Debug, Clone, Default)]
pub struct VariableSshKeyModel {
    pub id: Value<String>,
    pub domain: Value<String>,
    pub scope: VariableScope,
    pub variable: VariableFields,
    pub ssh_key: SshKeyFields,
}

impl Record for VariableSshKeyModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            domain: r.string("domain"),
            scope: VariableScope::read(&mut r),
            variable: VariableFields::read(&mut r),
            ssh_key: SshKeyFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        let builder = ObjectBuilder::new(path)
            .string("id", &self.id)
            .string("domain", &self.domain);
        self.ssh_key
            .write(self.variable.write(self.scope.write(builder)))
            .finish()
    }
}

#[async_trait]
impl ReadSpec for VariableSshKeyDataSource {
    type Model = VariableSshKeyModel;
    type Dto = Variable;

    const TYPE_NAME: &'static str = "buddy_variable_ssh_key";

    fn schema() -> Schema {
        variable_schema("Get an SSH key variable by key or variable ID").attrs(SshKeyFields::attributes())
    }

    async fn fetch(api: &dyn BuddyApi, model: &VariableSshKeyModel, diags: &mut Diagnostics) -> Option<Variable> {
        fetch_variable(api, &model.domain, &model.scope, &model.variable, VariableKind::SshKey, diags).await
    }

    fn map(mut model: VariableSshKeyModel, dto: Variable, diags: &mut Diagnostics) -> VariableSshKeyModel {
        if let Some(variable) = diags.capture(VariableFields::load(&dto, VariableKind::SshKey)) {
            model.id = double_id(&model.domain, &dto.id.to_string());
            model.scope = VariableScope::resolve(&dto, &model.scope);
            model.variable = variable;
            model.ssh_key = SshKeyFields::load(&dto);
        }
        model
    }
}
