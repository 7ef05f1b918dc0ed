//! End-to-end reads through the provider against an in-memory workspace

mod common;

use buddy_datasources::buddy::models::{
    Environment, Group, Integration, Member, Permission, Pipeline, Profile, Project, ProjectRef, Sandbox, Target,
    Variable, Webhook, Workspace,
};
use buddy_datasources::framework::{
    AttrType, Attribute, ConfigValidator, DataSource, DiagnosticKind, Mode, ReadContext, ReadResponse, Schema,
    StateValue,
};
use buddy_datasources::validators::Validator;
use buddy_datasources::{Provider, ReadRequest};
use common::{config, provider, set_attr, str_attr, FakeApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

fn projects() -> Vec<Project> {
    vec![
        Project {
            name: "web".to_string(),
            display_name: "Web".to_string(),
            status: "ACTIVE".to_string(),
            ..Default::default()
        },
        Project {
            name: "web-legacy".to_string(),
            display_name: "Web".to_string(),
            status: "CLOSED".to_string(),
            ..Default::default()
        },
    ]
}

fn variable(id: i64, key: &str, kind: &str) -> Variable {
    Variable {
        id,
        key: key.to_string(),
        kind: kind.to_string(),
        value: "secret!".to_string(),
        ..Default::default()
    }
}

fn members() -> Vec<Member> {
    let member = |id: i64, name: &str, email: &str| Member {
        id,
        name: name.to_string(),
        email: email.to_string(),
        ..Default::default()
    };
    vec![member(1, "Ann", "ann@acme.io"), member(2, "Bob", "bob@acme.io")]
}

fn groups() -> Vec<Group> {
    let group = |id: i64, name: &str| Group {
        id,
        name: name.to_string(),
        ..Default::default()
    };
    vec![group(3, "devs"), group(4, "ops")]
}

async fn read(provider: &Provider, type_name: &str, json: serde_json::Value) -> ReadResponse {
    let ds = provider.get(type_name).expect("registered data source");
    let config = config(ds, json);
    provider.read(&ReadContext::new(), type_name, &config).await
}

fn assert_not_found(response: &ReadResponse, detail: &str) {
    assert!(response.state.is_none());
    let err = response.diagnostics.first_error().expect("error");
    assert_eq!(err.kind, DiagnosticKind::NotFound);
    assert_eq!(err.detail, detail);
}

fn int_attr(state: &StateValue, name: &str) -> Option<i64> {
    state.get(name).and_then(StateValue::as_i64)
}

/// A value every validator on `attr` accepts
fn valid_value(attr: &Attribute) -> StateValue {
    match attr.ty {
        AttrType::Int64 => StateValue::Int64(1),
        AttrType::Bool => StateValue::Bool(true),
        _ => {
            let text = attr
                .validators
                .iter()
                .find_map(|v| match v {
                    Validator::Email => Some("ann@acme.io"),
                    Validator::OneOf(allowed) => allowed.first().copied(),
                    _ => None,
                })
                .unwrap_or("acme");
            StateValue::String(text.to_string())
        }
    }
}

/// Configuration holding only the required attributes; the rest are absent
fn required_only(schema: &Schema) -> BTreeMap<String, StateValue> {
    schema
        .attributes
        .iter()
        .filter(|(_, attr)| attr.mode == Mode::Required)
        .map(|(name, attr)| (name.clone(), valid_value(attr)))
        .collect()
}

#[tokio::test]
async fn test_project_by_name() {
    let (provider, api) = provider(FakeApi {
        projects: projects(),
        ..Default::default()
    });

    let response = read(&provider, "buddy_project", json!({"domain": "acme", "name": "web"})).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state = response.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:web"));
    assert_eq!(str_attr(&state, "display_name"), Some("Web"));
    assert_eq!(str_attr(&state, "status"), Some("ACTIVE"));
    assert_eq!(api.calls(), vec!["get_project acme web".to_string()]);
}

#[tokio::test]
async fn test_project_by_display_name_takes_first_match() {
    let (provider, api) = provider(FakeApi {
        projects: projects(),
        ..Default::default()
    });

    let response = read(&provider, "buddy_project", json!({"domain": "acme", "display_name": "Web"})).await;

    let state = response.state.expect("state");
    assert_eq!(str_attr(&state, "name"), Some("web"));
    assert_eq!(str_attr(&state, "id"), Some("acme:web"));
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_project_display_name_without_match_is_not_found() {
    let (provider, _) = provider(FakeApi {
        projects: projects(),
        ..Default::default()
    });

    let response = read(&provider, "buddy_project", json!({"domain": "acme", "display_name": "Nope"})).await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.contains_kind(DiagnosticKind::NotFound));
}

#[tokio::test]
async fn test_permissions_filtered_by_regex_and_type() {
    let permission = |id: i64, name: &str, kind: &str| Permission {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        ..Default::default()
    };
    let (provider, _) = provider(FakeApi {
        permissions: vec![
            permission(1, "read-only", "READ_ONLY"),
            permission(2, "readers-custom", "CUSTOM"),
            permission(3, "developer", "DEVELOPER"),
        ],
        ..Default::default()
    });

    let response = read(
        &provider,
        "buddy_permissions",
        json!({"domain": "acme", "name_regex": "^read", "type": "READ_ONLY"}),
    )
    .await;

    let state = response.state.expect("state");
    let permissions = set_attr(&state, "permissions");
    assert_eq!(permissions.len(), 1);
    assert_eq!(str_attr(&permissions[0], "name"), Some("read-only"));
    assert_eq!(permissions[0].get("permission_id").and_then(StateValue::as_i64), Some(1));
    assert!(str_attr(&state, "id").is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_ssh_key_by_key_skips_other_types() {
    let mut key = variable(3, "deploy", "SSH_KEY");
    key.project = Some(ProjectRef {
        name: "web".to_string(),
        display_name: "Web".to_string(),
    });
    key.key_fingerprint = "SHA256:abc".to_string();
    let (provider, api) = provider(FakeApi {
        variables: vec![
            variable(1, "deploy", "VAR"),
            variable(2, "other", "SSH_KEY"),
            key,
        ],
        ..Default::default()
    });

    let response = read(
        &provider,
        "buddy_variable_ssh_key",
        json!({"domain": "acme", "key": "deploy", "project_name": "web"}),
    )
    .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state = response.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:3"));
    assert_eq!(state.get("variable_id").and_then(StateValue::as_i64), Some(3));
    assert_eq!(state.get("encrypted").and_then(StateValue::as_bool), Some(true));
    assert_eq!(state.get("settable").and_then(StateValue::as_bool), Some(false));
    assert_eq!(str_attr(&state, "project_name"), Some("web"));
    assert_eq!(str_attr(&state, "key_fingerprint"), Some("SHA256:abc"));
    assert_eq!(state.get("pipeline_id"), Some(&StateValue::Null));

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("get_variables acme"));
    assert!(calls[0].contains("projectName"));
}

#[tokio::test]
async fn test_variable_by_id_with_wrong_type_is_not_found() {
    let (provider, _) = provider(FakeApi {
        variables: vec![variable(2, "other", "SSH_KEY")],
        ..Default::default()
    });

    let response = read(&provider, "buddy_variable", json!({"domain": "acme", "variable_id": 2})).await;

    assert!(response.state.is_none());
    let err = response.diagnostics.first_error().expect("error");
    assert_eq!(err.kind, DiagnosticKind::NotFound);
    assert_eq!(err.detail, "variable not found");
}

#[tokio::test]
async fn test_missing_selector_fails_before_any_call() {
    let (provider, api) = provider(FakeApi::default());

    let response = read(&provider, "buddy_group", json!({"domain": "acme"})).await;

    assert!(response.state.is_none());
    let err = response.diagnostics.first_error().expect("error");
    assert_eq!(err.kind, DiagnosticKind::Configuration);
    assert_eq!(err.path.as_ref().map(|p| p.to_string()), Some("group_id".to_string()));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_domain_fails_before_any_call() {
    let (provider, api) = provider(FakeApi {
        projects: projects(),
        ..Default::default()
    });

    let response = read(&provider, "buddy_project", json!({"domain": "Acme!", "name": "web"})).await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.contains_kind(DiagnosticKind::Configuration));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_member_by_email() {
    let (provider, _) = provider(FakeApi {
        members: members(),
        ..Default::default()
    });

    let response = read(&provider, "buddy_member", json!({"domain": "acme", "email": "bob@acme.io"})).await;

    let state = response.state.expect("state");
    assert_eq!(str_attr(&state, "name"), Some("Bob"));
    assert_eq!(str_attr(&state, "id"), Some("acme:2"));
}

#[tokio::test]
async fn test_cancelled_read_writes_no_state() {
    let (provider, _) = provider(FakeApi {
        projects: projects(),
        ..Default::default()
    });
    let ds = provider.get("buddy_project").expect("registered");
    let config = config(ds, json!({"domain": "acme", "name": "web"}));

    let token = CancellationToken::new();
    token.cancel();
    let response = provider
        .read(&ReadContext::with_token(token), "buddy_project", &config)
        .await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.contains_kind(DiagnosticKind::Cancelled));
}

#[tokio::test]
async fn test_read_many_keeps_request_order() {
    let (provider, _) = provider(FakeApi {
        projects: projects(),
        ..Default::default()
    });
    let ds = provider.get("buddy_project").expect("registered");
    let requests: Vec<_> = ["web-legacy", "web", "missing"]
        .iter()
        .map(|name| ReadRequest {
            type_name: "buddy_project".to_string(),
            config: config(ds, json!({"domain": "acme", "name": name})),
        })
        .collect();

    let responses = provider.read_many(&ReadContext::new(), &requests).await;

    let names: Vec<Option<&str>> = responses
        .iter()
        .map(|r| r.state.as_ref().and_then(|s| str_attr(s, "name")))
        .collect();
    assert_eq!(names, vec![Some("web-legacy"), Some("web"), None]);
}

#[tokio::test]
async fn test_single_entity_reads_need_exactly_one_selector() {
    let (provider, api) = provider(FakeApi::default());
    let mut checked = Vec::new();

    for ds in provider.data_sources() {
        let schema = ds.schema();
        for rule in &schema.config_validators {
            let ConfigValidator::ExactlyOneOf(names) = rule;
            let base = required_only(&schema);

            for name in names {
                let mut single = base.clone();
                single.insert(name.to_string(), valid_value(&schema.attributes[*name]));
                let diags = schema.validate_config(&StateValue::Object(single));
                assert!(!diags.has_error(), "{} with only {}: {:?}", ds.type_name(), name, diags);
            }

            let mut both = base.clone();
            for name in &names[..2] {
                both.insert(name.to_string(), valid_value(&schema.attributes[*name]));
            }

            for (case, config) in [("no selector", base), ("two selectors", both)] {
                let response = provider
                    .read(&ReadContext::new(), ds.type_name(), &StateValue::Object(config))
                    .await;
                assert!(response.state.is_none(), "{}: {}", ds.type_name(), case);
                let err = response.diagnostics.first_error().expect("error");
                assert_eq!(err.kind, DiagnosticKind::Configuration, "{}: {}", ds.type_name(), case);
                assert_eq!(err.summary, "Invalid Attribute Combination", "{}: {}", ds.type_name(), case);
            }
            checked.push(ds.type_name());
        }
    }

    assert_eq!(api.call_count(), 0);
    checked.sort_unstable();
    assert_eq!(
        checked,
        vec![
            "buddy_environment",
            "buddy_group",
            "buddy_integration",
            "buddy_member",
            "buddy_permission",
            "buddy_pipeline",
            "buddy_project",
            "buddy_sandbox",
            "buddy_target",
            "buddy_variable",
            "buddy_variable_ssh_key",
            "buddy_webhook",
            "buddy_workspace",
        ]
    );
}

#[tokio::test]
async fn test_project_access_reads_need_a_positive_id() {
    let (provider, api) = provider(FakeApi::default());

    for (type_name, id_attr) in [("buddy_project_member", "member_id"), ("buddy_project_group", "group_id")] {
        let missing = read(&provider, type_name, json!({"domain": "acme", "project_name": "web"})).await;
        let err = missing.diagnostics.first_error().expect("error");
        assert_eq!(err.kind, DiagnosticKind::Configuration);
        assert_eq!(err.summary, "Missing required argument");

        let mut zero = json!({"domain": "acme", "project_name": "web"});
        zero[id_attr] = json!(0);
        let zero = read(&provider, type_name, zero).await;
        let err = zero.diagnostics.first_error().expect("error");
        assert_eq!(err.kind, DiagnosticKind::Configuration);
        assert_eq!(err.path.as_ref().map(|p| p.to_string()), Some(id_attr.to_string()));
    }
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_sparse_configuration_reads() {
    let (provider, api) = provider(FakeApi {
        groups: groups(),
        ..Default::default()
    });
    let config = StateValue::Object(BTreeMap::from([
        ("domain".to_string(), StateValue::String("acme".into())),
        ("group_id".to_string(), StateValue::Int64(3)),
    ]));

    let response = provider.read(&ReadContext::new(), "buddy_group", &config).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert_eq!(str_attr(&response.state.expect("state"), "name"), Some("devs"));
    assert_eq!(api.calls(), vec!["get_group acme 3".to_string()]);
}

#[tokio::test]
async fn test_workspace_family() {
    let workspace = |id: i64, name: &str, domain: &str| Workspace {
        id,
        name: name.to_string(),
        domain: domain.to_string(),
        ..Default::default()
    };
    let (provider, api) = provider(FakeApi {
        workspaces: vec![workspace(1, "Acme", "acme"), workspace(2, "Beta", "beta-co")],
        ..Default::default()
    });

    let found = read(&provider, "buddy_workspace", json!({"domain": "acme"})).await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme"));
    assert_eq!(str_attr(&state, "name"), Some("Acme"));
    assert_eq!(int_attr(&state, "workspace_id"), Some(1));

    let missing = read(&provider, "buddy_workspace", json!({"name": "Gamma"})).await;
    assert_not_found(&missing, "workspace not found");

    let listed = read(&provider, "buddy_workspaces", json!({"domain_regex": "^beta"})).await;
    let state = listed.state.expect("state");
    let workspaces = set_attr(&state, "workspaces");
    assert_eq!(workspaces.len(), 1);
    assert_eq!(str_attr(&workspaces[0], "name"), Some("Beta"));

    assert_eq!(
        api.calls(),
        vec!["get_workspace acme", "get_workspaces", "get_workspaces"]
    );
}

#[tokio::test]
async fn test_group_family() {
    let (provider, api) = provider(FakeApi {
        groups: groups(),
        members: members(),
        ..Default::default()
    });

    let found = read(&provider, "buddy_group", json!({"domain": "acme", "name": "ops"})).await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:4"));
    assert_eq!(int_attr(&state, "group_id"), Some(4));

    let missing = read(&provider, "buddy_group", json!({"domain": "acme", "group_id": 9})).await;
    assert_not_found(&missing, "group not found");

    let listed = read(&provider, "buddy_groups", json!({"domain": "acme", "name_regex": "^d"})).await;
    let state = listed.state.expect("state");
    let groups = set_attr(&state, "groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(str_attr(&groups[0], "name"), Some("devs"));

    let in_group = read(
        &provider,
        "buddy_group_members",
        json!({"domain": "acme", "group_id": 3, "name_regex": "^A"}),
    )
    .await;
    let state = in_group.state.expect("state");
    let members = set_attr(&state, "members");
    assert_eq!(members.len(), 1);
    assert_eq!(str_attr(&members[0], "email"), Some("ann@acme.io"));

    assert_eq!(
        api.calls(),
        vec!["get_groups acme", "get_group acme 9", "get_groups acme", "get_group_members acme 3"]
    );
}

#[tokio::test]
async fn test_member_family() {
    let (provider, _) = provider(FakeApi {
        members: members(),
        ..Default::default()
    });

    let found = read(&provider, "buddy_member", json!({"domain": "acme", "member_id": 1})).await;
    assert_eq!(str_attr(&found.state.expect("state"), "email"), Some("ann@acme.io"));

    let missing = read(&provider, "buddy_member", json!({"domain": "acme", "member_id": 9})).await;
    assert_not_found(&missing, "member not found");

    let by_name = read(&provider, "buddy_member", json!({"domain": "acme", "name": "Zed"})).await;
    assert_not_found(&by_name, "member not found");

    let listed = read(&provider, "buddy_members", json!({"domain": "acme", "name_regex": "^B"})).await;
    let state = listed.state.expect("state");
    let members = set_attr(&state, "members");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].get("member_id").and_then(StateValue::as_i64), Some(2));
}

#[tokio::test]
async fn test_project_member_and_group_family() {
    let (provider, api) = provider(FakeApi {
        groups: groups(),
        members: members(),
        ..Default::default()
    });

    let member = read(
        &provider,
        "buddy_project_member",
        json!({"domain": "acme", "project_name": "web", "member_id": 2}),
    )
    .await;
    let state = member.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:web:2"));
    assert_eq!(str_attr(&state, "name"), Some("Bob"));

    let missing = read(
        &provider,
        "buddy_project_member",
        json!({"domain": "acme", "project_name": "web", "member_id": 9}),
    )
    .await;
    assert_not_found(&missing, "project member not found");

    let group = read(
        &provider,
        "buddy_project_group",
        json!({"domain": "acme", "project_name": "web", "group_id": 3}),
    )
    .await;
    let state = group.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:web:3"));
    assert_eq!(str_attr(&state, "name"), Some("devs"));

    let missing = read(
        &provider,
        "buddy_project_group",
        json!({"domain": "acme", "project_name": "web", "group_id": 9}),
    )
    .await;
    assert_not_found(&missing, "project group not found");

    let listed = read(&provider, "buddy_project_groups", json!({"domain": "acme", "project_name": "web"})).await;
    assert_eq!(set_attr(&listed.state.expect("state"), "groups").len(), 2);

    let listed = read(
        &provider,
        "buddy_project_members",
        json!({"domain": "acme", "project_name": "web", "name_regex": "^Ann$"}),
    )
    .await;
    assert_eq!(set_attr(&listed.state.expect("state"), "members").len(), 1);

    assert_eq!(
        api.calls(),
        vec![
            "get_project_member acme web 2",
            "get_project_member acme web 9",
            "get_project_group acme web 3",
            "get_project_group acme web 9",
            "get_project_groups acme web",
            "get_project_members acme web",
        ]
    );
}

#[tokio::test]
async fn test_integration_family() {
    let integration = |hash_id: &str, name: &str, kind: &str| Integration {
        hash_id: hash_id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        ..Default::default()
    };
    let (provider, _) = provider(FakeApi {
        integrations: vec![
            integration("abc", "aws", "AMAZON"),
            integration("def", "droplets", "DIGITAL_OCEAN"),
        ],
        ..Default::default()
    });

    let found = read(&provider, "buddy_integration", json!({"domain": "acme", "integration_id": "abc"})).await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:abc"));
    assert_eq!(str_attr(&state, "name"), Some("aws"));
    assert_eq!(str_attr(&state, "type"), Some("AMAZON"));

    let missing = read(&provider, "buddy_integration", json!({"domain": "acme", "name": "gcp"})).await;
    assert_not_found(&missing, "integration not found");

    let listed = read(&provider, "buddy_integrations", json!({"domain": "acme", "type": "DIGITAL_OCEAN"})).await;
    let state = listed.state.expect("state");
    let integrations = set_attr(&state, "integrations");
    assert_eq!(integrations.len(), 1);
    assert_eq!(str_attr(&integrations[0], "integration_id"), Some("def"));
}

#[tokio::test]
async fn test_pipeline_family() {
    let pipeline = |id: i64, name: &str| Pipeline {
        id,
        name: name.to_string(),
        ..Default::default()
    };
    let (provider, api) = provider(FakeApi {
        pipelines: vec![pipeline(7, "deploy"), pipeline(8, "test")],
        ..Default::default()
    });

    let found = read(
        &provider,
        "buddy_pipeline",
        json!({"domain": "acme", "project_name": "web", "name": "deploy"}),
    )
    .await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:web:7"));
    assert_eq!(int_attr(&state, "pipeline_id"), Some(7));

    let missing = read(
        &provider,
        "buddy_pipeline",
        json!({"domain": "acme", "project_name": "web", "pipeline_id": 9}),
    )
    .await;
    assert_not_found(&missing, "pipeline not found");

    let listed = read(
        &provider,
        "buddy_pipelines",
        json!({"domain": "acme", "project_name": "web", "name_regex": "^t"}),
    )
    .await;
    let state = listed.state.expect("state");
    let pipelines = set_attr(&state, "pipelines");
    assert_eq!(pipelines.len(), 1);
    assert_eq!(str_attr(&pipelines[0], "name"), Some("test"));

    assert_eq!(
        api.calls(),
        vec!["get_pipelines acme web", "get_pipeline acme web 9", "get_pipelines acme web"]
    );
}

#[tokio::test]
async fn test_environment_family() {
    let environment = |id: &str, name: &str| Environment {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    };
    let (provider, _) = provider(FakeApi {
        environments: vec![environment("env-1", "staging"), environment("env-2", "production")],
        ..Default::default()
    });

    let found = read(
        &provider,
        "buddy_environment",
        json!({"domain": "acme", "project_name": "web", "environment_id": "env-2"}),
    )
    .await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:web:env-2"));
    assert_eq!(str_attr(&state, "name"), Some("production"));

    let missing = read(
        &provider,
        "buddy_environment",
        json!({"domain": "acme", "project_name": "web", "name": "qa"}),
    )
    .await;
    assert_not_found(&missing, "environment not found");

    let listed = read(
        &provider,
        "buddy_environments",
        json!({"domain": "acme", "project_name": "web", "name_regex": "^stag"}),
    )
    .await;
    let state = listed.state.expect("state");
    let environments = set_attr(&state, "environments");
    assert_eq!(environments.len(), 1);
    assert_eq!(str_attr(&environments[0], "environment_id"), Some("env-1"));
}

#[tokio::test]
async fn test_sandbox_family() {
    let (provider, api) = provider(FakeApi {
        sandboxes: vec![Sandbox {
            id: "sb1".to_string(),
            name: "preview".to_string(),
            project: Some(ProjectRef {
                name: "web".to_string(),
                display_name: "Web".to_string(),
            }),
            ..Default::default()
        }],
        ..Default::default()
    });

    let found = read(&provider, "buddy_sandbox", json!({"domain": "acme", "name": "preview"})).await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:sb1"));
    assert_eq!(str_attr(&state, "project_name"), Some("web"));

    let missing = read(&provider, "buddy_sandbox", json!({"domain": "acme", "sandbox_id": "sb9"})).await;
    assert_not_found(&missing, "sandbox not found");

    let listed = read(&provider, "buddy_sandboxes", json!({"domain": "acme", "name_regex": "^pre"})).await;
    assert_eq!(set_attr(&listed.state.expect("state"), "sandboxes").len(), 1);

    let calls = api.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].starts_with("get_sandboxes acme"));
    assert_eq!(calls[1], "get_sandbox acme sb9");
}

#[tokio::test]
async fn test_target_family() {
    let target = |id: &str, name: &str| Target {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    };
    let (provider, _) = provider(FakeApi {
        targets: vec![target("t1", "prod-ftp"), target("t2", "prod-ssh")],
        ..Default::default()
    });

    let found = read(&provider, "buddy_target", json!({"domain": "acme", "target_id": "t1"})).await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:t1"));
    assert_eq!(str_attr(&state, "name"), Some("prod-ftp"));

    let missing = read(&provider, "buddy_target", json!({"domain": "acme", "name": "staging-ftp"})).await;
    assert_not_found(&missing, "target not found");

    let listed = read(&provider, "buddy_targets", json!({"domain": "acme", "name_regex": "ssh$"})).await;
    let state = listed.state.expect("state");
    let targets = set_attr(&state, "targets");
    assert_eq!(targets.len(), 1);
    assert_eq!(str_attr(&targets[0], "target_id"), Some("t2"));
}

#[tokio::test]
async fn test_webhook_family() {
    let webhook = |id: i64, target_url: &str| Webhook {
        id,
        target_url: target_url.to_string(),
        ..Default::default()
    };
    let (provider, _) = provider(FakeApi {
        webhooks: vec![
            webhook(5, "https://hooks.acme.io/a"),
            webhook(6, "https://hooks.acme.io/b"),
        ],
        ..Default::default()
    });

    let found = read(
        &provider,
        "buddy_webhook",
        json!({"domain": "acme", "target_url": "https://hooks.acme.io/b"}),
    )
    .await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:6"));
    assert_eq!(int_attr(&state, "webhook_id"), Some(6));

    let missing = read(&provider, "buddy_webhook", json!({"domain": "acme", "webhook_id": 9})).await;
    assert_not_found(&missing, "webhook not found");

    let listed = read(&provider, "buddy_webhooks", json!({"domain": "acme", "target_url_regex": "/a$"})).await;
    let state = listed.state.expect("state");
    let webhooks = set_attr(&state, "webhooks");
    assert_eq!(webhooks.len(), 1);
    assert_eq!(webhooks[0].get("webhook_id").and_then(StateValue::as_i64), Some(5));
}

#[tokio::test]
async fn test_profile() {
    let (provider, _) = provider(FakeApi {
        profile: Some(Profile {
            id: 11,
            name: "Ann".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    });
    let found = read(&provider, "buddy_profile", json!({})).await;
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("11"));
    assert_eq!(int_attr(&state, "member_id"), Some(11));
    assert_eq!(str_attr(&state, "name"), Some("Ann"));

    let (provider, _) = common::provider(FakeApi::default());
    let missing = read(&provider, "buddy_profile", json!({})).await;
    assert_not_found(&missing, "profile not found");
}

#[tokio::test]
async fn test_variable_by_key_skips_ssh_keys() {
    let (provider, api) = provider(FakeApi {
        variables: vec![variable(1, "TOKEN", "SSH_KEY"), variable(2, "TOKEN", "VAR")],
        ..Default::default()
    });

    let found = read(&provider, "buddy_variable", json!({"domain": "acme", "key": "TOKEN"})).await;
    assert!(found.diagnostics.is_empty(), "{:?}", found.diagnostics);
    let state = found.state.expect("state");
    assert_eq!(str_attr(&state, "id"), Some("acme:2"));
    assert_eq!(str_attr(&state, "type"), Some("VAR"));
    assert_eq!(str_attr(&state, "value"), Some("secret!"));
    assert_eq!(state.get("encrypted").and_then(StateValue::as_bool), Some(false));

    let missing = read(&provider, "buddy_variable", json!({"domain": "acme", "key": "MISSING"})).await;
    assert_not_found(&missing, "variable not found");

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.starts_with("get_variables acme")));
}
