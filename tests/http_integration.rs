//! Integration tests for the Buddy HTTP client using wiremock
//!
//! These tests run the real client, and the provider on top of it,
//! against mocked endpoints: status handling, paging, authentication
//! and query parameters.

use buddy_datasources::buddy::client::MAX_PAGES;
use buddy_datasources::buddy::{ApiError, BuddyApi, BuddyClient, HttpOptions};
use buddy_datasources::framework::{AttrPath, DataSource, DiagnosticKind, ReadContext, ReadResponse, StateValue};
use buddy_datasources::Provider;
use serde_json::{json, Value as Json};
use std::sync::Arc;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> BuddyClient {
    BuddyClient::new(&server.uri(), TOKEN, &HttpOptions::default()).expect("client")
}

async fn read(server: &MockServer, type_name: &str, config: Json) -> ReadResponse {
    let provider = Provider::new(Arc::new(client(server)));
    let ds = provider.get(type_name).expect("registered data source");
    let config = StateValue::from_json(&ds.schema().object_type(), &config, &AttrPath::default())
        .expect("valid configuration");
    provider.read(&ReadContext::new(), type_name, &config).await
}

fn members_page(start: i64, count: i64) -> Json {
    let members: Vec<Json> = (start..start + count)
        .map(|id| json!({"id": id, "name": format!("member-{}", id), "email": format!("m{}@acme.io", id)}))
        .collect();
    json!({ "members": members })
}

/// Answers every page with a full page of fresh members
struct EndlessMembers;

impl Respond for EndlessMembers {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let page: i64 = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(1);
        ResponseTemplate::new(200).set_body_json(members_page((page - 1) * 100 + 1, 100))
    }
}

/// Client-level behavior
mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_project_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/projects/web"))
            .and(bearer_token(TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "web",
                "display_name": "Web",
                "status": "ACTIVE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let project = client(&server).get_project("acme", "web").await.expect("project");
        assert_eq!(project.display_name, "Web");
        assert_eq!(project.status, "ACTIVE");
    }

    #[tokio::test]
    async fn test_null_fields_take_defaults() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/groups/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "name": "devs",
                "description": null,
                "auto_assign_permission_set_id": null
            })))
            .mount(&server)
            .await;

        let group = client(&server).get_group("acme", 3).await.expect("group");
        assert_eq!(group.description, "");
        assert_eq!(group.auto_assign_permission_set_id, None);
    }

    #[tokio::test]
    async fn test_members_are_paged_until_a_short_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(1, 100)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(101, 3)))
            .expect(1)
            .mount(&server)
            .await;

        let members = client(&server).get_members("acme").await.expect("members");
        assert_eq!(members.len(), 103);
        assert_eq!(members[102].name, "member-103");
    }

    #[tokio::test]
    async fn test_empty_page_ends_the_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(1, 100)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"members": []})))
            .expect(1)
            .mount(&server)
            .await;

        let members = client(&server).get_members("acme").await.expect("members");
        assert_eq!(members.len(), 100);
    }

    #[tokio::test]
    async fn test_repeated_full_page_is_a_paging_error() {
        let server = MockServer::start().await;

        // Ignores `page` and always answers the same 100 members
        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(1, 100)))
            .expect(2)
            .mount(&server)
            .await;

        let err = client(&server).get_members("acme").await.unwrap_err();
        assert!(matches!(err, ApiError::Paging { .. }), "{:?}", err);
        assert!(err.to_string().contains("page 2 repeats page 1"));
    }

    #[tokio::test]
    async fn test_endless_listing_stops_at_the_page_cap() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .respond_with(EndlessMembers)
            .expect(MAX_PAGES as u64)
            .mount(&server)
            .await;

        let err = client(&server).get_members("acme").await.unwrap_err();
        assert!(matches!(err, ApiError::Paging { .. }), "{:?}", err);
        assert!(err.to_string().contains(&format!("more than {} pages", MAX_PAGES)));
    }

    #[tokio::test]
    async fn test_404_keeps_status_and_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/webhooks/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"message": "Webhook not found"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server).get_webhook("acme", 9).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "Webhook not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).get_profile().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        let client = BuddyClient::new("http://127.0.0.1:1", TOKEN, &HttpOptions::default()).expect("client");
        let err = client.get_workspaces().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}

/// Reads through the provider
mod provider_tests {
    use super::*;

    #[tokio::test]
    async fn test_404_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/projects/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let response = read(&server, "buddy_project", json!({"domain": "acme", "name": "ghost"})).await;

        assert!(response.state.is_none());
        let err = response.diagnostics.first_error().expect("error");
        assert_eq!(err.kind, DiagnosticKind::NotFound);
        assert_eq!(err.detail, "project not found");
    }

    #[tokio::test]
    async fn test_inactive_workspace_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/projects/web"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "errors": [{"message": "Only active workspace have access to API"}]
            })))
            .mount(&server)
            .await;

        let response = read(&server, "buddy_project", json!({"domain": "acme", "name": "web"})).await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.contains_kind(DiagnosticKind::NotFound));
        assert!(!response.diagnostics.contains_kind(DiagnosticKind::Api));
    }

    #[tokio::test]
    async fn test_other_403_is_an_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/projects/web"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "errors": [{"message": "Access denied"}]
            })))
            .mount(&server)
            .await;

        let response = read(&server, "buddy_project", json!({"domain": "acme", "name": "web"})).await;

        assert!(response.state.is_none());
        let err = response.diagnostics.first_error().expect("error");
        assert_eq!(err.kind, DiagnosticKind::Api);
        assert!(err.detail.starts_with("Unable to get project, got error:"));
        assert!(err.detail.contains("Access denied"));
    }

    #[tokio::test]
    async fn test_server_error_is_an_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/groups"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let response = read(&server, "buddy_groups", json!({"domain": "acme"})).await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.contains_kind(DiagnosticKind::Api));
    }

    #[tokio::test]
    async fn test_paging_error_is_an_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(1, 100)))
            .mount(&server)
            .await;

        let response = read(&server, "buddy_members", json!({"domain": "acme"})).await;

        assert!(response.state.is_none());
        let err = response.diagnostics.first_error().expect("error");
        assert_eq!(err.kind, DiagnosticKind::Api);
        assert!(err.detail.contains("repeats"));
    }

    #[tokio::test]
    async fn test_variable_scope_is_sent_as_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/variables"))
            .and(query_param("projectName", "web"))
            .and(query_param("pipelineId", "7"))
            .and(bearer_token(TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "variables": [
                    {"id": 1, "key": "TOKEN", "type": "VAR", "value": "x", "description": null},
                    {"id": 2, "key": "TOKEN", "type": "VAR", "value": "y",
                     "project": {"name": "web"}, "pipeline": {"id": 7, "name": "deploy"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = read(
            &server,
            "buddy_variable",
            json!({"domain": "acme", "key": "TOKEN", "project_name": "web", "pipeline_id": 7}),
        )
        .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.state.expect("state");
        assert_eq!(state.get("id").and_then(StateValue::as_str), Some("acme:1"));
        assert_eq!(state.get("description").and_then(StateValue::as_str), Some(""));
        assert_eq!(state.get("project_name").and_then(StateValue::as_str), Some("web"));
        assert_eq!(state.get("pipeline_id").and_then(StateValue::as_i64), Some(7));
    }

    #[tokio::test]
    async fn test_list_read_filters_across_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(1, 100)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workspaces/acme/members"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(members_page(101, 20)))
            .mount(&server)
            .await;

        let response = read(&server, "buddy_members", json!({"domain": "acme", "name_regex": "^member-11\\d$"})).await;

        let state = response.state.expect("state");
        let members = state.get("members").and_then(StateValue::as_set).expect("members");
        assert_eq!(members.len(), 10);
    }
}
