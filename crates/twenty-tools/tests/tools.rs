//! Handler and resource tests against mock Twenty workspaces.

use std::sync::Arc;

use serde_json::json;
use twenty_client::{ClientManager, SearchFilter};
use twenty_config::{ConfigSource, WorkspaceEntry, WorkspaceRegistry, WorkspacesDeclaration};
use twenty_tools::{CrmTools, Entity, ToolError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tools_for(servers: &[(&str, &MockServer)]) -> CrmTools {
    let entries = servers
        .iter()
        .map(|(name, server)| WorkspaceEntry::new(*name, server.uri(), format!("{}-key", name)))
        .collect();
    let registry =
        WorkspaceRegistry::from_source(ConfigSource::multi(WorkspacesDeclaration::new(entries)))
            .unwrap();
    CrmTools::new(Arc::new(ClientManager::new(registry)))
}

#[tokio::test]
async fn test_get_person_envelope() {
    let server = MockServer::start().await;
    let body = json!({"data": {"person": {"id": "p1"}}});

    Mock::given(method("GET"))
        .and(path("/rest/people/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let envelope = tools.get_record(Entity::People, "p1", None).await;
    assert_eq!(envelope, json!({"success": true, "person": body}));
}

#[tokio::test]
async fn test_list_companies_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/companies"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"companies": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let envelope = tools.list_records(Entity::Companies, 20, 40, None).await;
    assert_eq!(
        envelope,
        json!({"success": true, "companies": {"data": {"companies": []}}})
    );
}

#[tokio::test]
async fn test_mutation_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/opportunities"))
        .and(body_json(json!({"name": "Renewal"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "o1"})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t1"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/notes/n1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);

    let created = tools
        .create_record(Entity::Opportunities, &json!({"name": "Renewal"}), None)
        .await;
    assert_eq!(
        created,
        json!({
            "success": true,
            "message": "Opportunity created successfully",
            "opportunity": {"id": "o1"}
        })
    );

    let updated = tools
        .update_record(Entity::Tasks, "t1", &json!({"status": "DONE"}), None)
        .await;
    assert_eq!(updated["message"], "Task t1 updated successfully");
    assert_eq!(updated["task"], json!({"id": "t1"}));

    let deleted = tools.delete_record(Entity::Notes, "n1", None).await;
    assert_eq!(
        deleted,
        json!({"success": true, "message": "Note n1 deleted successfully"})
    );
}

#[tokio::test]
async fn test_api_error_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/people/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Record not found"))
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let envelope = tools.get_record(Entity::People, "missing", None).await;
    assert_eq!(
        envelope,
        json!({"error": "Failed to get person: HTTP 404: Record not found"})
    );
}

#[tokio::test]
async fn test_unknown_workspace_is_unexpected_error() {
    let server = MockServer::start().await;
    let tools = tools_for(&[("main", &server)]);

    let envelope = tools
        .list_records(Entity::People, 20, 0, Some("archive"))
        .await;
    assert_eq!(
        envelope,
        json!({"error": "Unexpected error: Workspace 'archive' not found. Available: main"})
    );
}

#[tokio::test]
async fn test_workspace_routing() {
    let sales = MockServer::start().await;
    let support = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/companies/c1"))
        .and(header("Authorization", "Bearer support-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c1"})))
        .expect(1)
        .mount(&support)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&sales)
        .await;

    let tools = tools_for(&[("sales", &sales), ("support", &support)]);
    let envelope = tools
        .get_record(Entity::Companies, "c1", Some("support"))
        .await;
    assert_eq!(envelope["company"]["id"], "c1");
}

#[tokio::test]
async fn test_search_basic_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/companies/search"))
        .and(query_param("query", "acme"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"companies": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let envelope = tools
        .search_basic(Entity::Companies, "acme", 10, None)
        .await;
    assert_eq!(
        envelope,
        json!({"success": true, "results": {"data": {"companies": []}}})
    );
}

#[tokio::test]
async fn test_search_complex_sends_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/opportunities/search"))
        .and(body_json(json!({
            "filter": {"and": [{"field": "stage", "operator": "neq", "value": "LOST"}]},
            "limit": 5,
            "orderBy": "amount",
            "orderDirection": "DESC"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"opportunities": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let envelope = tools
        .search_complex(
            Entity::Opportunities,
            vec![SearchFilter::new("stage", "neq", "LOST")],
            5,
            Some("amount"),
            "desc",
            None,
        )
        .await;
    assert_eq!(envelope["success"], true);
}

#[tokio::test]
async fn test_search_complex_rejects_bad_direction() {
    let server = MockServer::start().await;
    let tools = tools_for(&[("main", &server)]);

    let envelope = tools
        .search_complex(Entity::People, vec![], 20, Some("createdAt"), "up", None)
        .await;
    let message = envelope["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to search people: Invalid argument:"));
}

#[tokio::test]
async fn test_search_unsupported_for_notes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let envelope = tools.search_basic(Entity::Notes, "agenda", 20, None).await;
    assert_eq!(
        envelope,
        json!({"error": "Failed to search notes: notes do not support search"})
    );
}

#[tokio::test]
async fn test_metadata_envelopes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/metadata/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"objects": []}})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/metadata/objects/company"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nameSingular": "company"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/metadata/objects/company/fields"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    assert_eq!(
        tools.get_objects(None).await,
        json!({"success": true, "objects": {"data": {"objects": []}}})
    );
    assert_eq!(
        tools.get_object_schema("company", None).await,
        json!({"success": true, "schema": {"nameSingular": "company"}})
    );
    assert_eq!(
        tools.get_fields("company", None).await,
        json!({"error": "Failed to get fields: HTTP 500: boom"})
    );
}

#[tokio::test]
async fn test_workspace_tools() {
    let sales = MockServer::start().await;
    let support = MockServer::start().await;
    let tools = tools_for(&[("sales", &sales), ("support", &support)]);

    assert_eq!(
        tools.list_workspaces(),
        json!({"workspaces": ["sales", "support"], "default": "sales"})
    );

    let info = tools.get_workspace_info(Some("support"));
    assert_eq!(info["name"], "support");
    assert_eq!(info["base_url"], support.uri());
    assert_eq!(info["is_default"], false);

    assert_eq!(tools.get_workspace_info(None)["is_default"], true);

    let missing = tools.get_workspace_info(Some("archive"));
    assert_eq!(
        missing,
        json!({"error": "Workspace 'archive' not found. Available: sales, support"})
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Resources
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_directory_resource_requests_hundred() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/companies"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"companies": [
            {"id": "c1", "name": "Acme", "domainName": "acme.com", "city": "Berlin"}
        ]}})))
        .expect(1)
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let text = tools.read_resource("companies://list").await.unwrap();
    assert_eq!(
        text,
        "Companies Directory (1 records):\n\n• Acme (acme.com)\n  ID: c1, City: Berlin"
    );
}

#[tokio::test]
async fn test_profile_resource() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/people/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"person": {
            "id": "p1",
            "name": {"firstName": "Grace", "lastName": "Hopper"},
            "emails": {"primaryEmail": "grace@example.com"},
            "createdAt": "2024-03-01"
        }}})))
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    let text = tools.read_resource("people://p1").await.unwrap();
    assert!(text.starts_with("Person Profile - Grace Hopper\nID: p1\n"));
    assert!(text.contains("Email: grace@example.com\n"));
    assert!(text.contains("Created: 2024-03-01\n"));
}

#[tokio::test]
async fn test_resource_errors_render_as_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/opportunities/o1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/metadata/objects"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let tools = tools_for(&[("main", &server)]);
    assert_eq!(
        tools.read_resource("opportunities://o1").await.unwrap(),
        "Error retrieving opportunity o1: HTTP 403: forbidden"
    );
    assert_eq!(
        tools.read_resource("schema://objects").await.unwrap(),
        "Error retrieving schema: HTTP 502: bad gateway"
    );
}

#[tokio::test]
async fn test_unknown_resource_is_error() {
    let server = MockServer::start().await;
    let tools = tools_for(&[("main", &server)]);

    let err = tools.read_resource("tasks://list").await.unwrap_err();
    assert!(matches!(err, ToolError::UnknownResource(uri) if uri == "tasks://list"));
}

#[tokio::test]
async fn test_dot_segment_ids_never_reach_the_backend() {
    let server = MockServer::start().await;
    let tools = tools_for(&[("main", &server)]);

    let envelope = tools.delete_record(Entity::People, "..", None).await;
    assert_eq!(
        envelope,
        json!({"error": "Failed to delete person: Invalid argument: invalid path segment '..'"})
    );

    let err = tools.read_resource("people://..").await.unwrap_err();
    assert!(matches!(err, ToolError::UnknownResource(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}
