mod common;
use common::{closed_base_url, StubServer};

use digitalocean_mcp::errors::ToolErrorKind;
use digitalocean_mcp::services::credentials::ApiConfig;
use digitalocean_mcp::services::dispatcher::{ParameterMap, RequestDispatcher};
use digitalocean_mcp::services::endpoint::EndpointDescriptor;
use digitalocean_mcp::services::logger::Logger;
use serde_json::{json, Value};

fn endpoint(raw: Value) -> EndpointDescriptor {
    serde_json::from_value(raw).expect("descriptor")
}

fn params(raw: Value) -> ParameterMap {
    match raw {
        Value::Object(map) => map,
        _ => panic!("parameters must be an object"),
    }
}

fn dispatcher() -> RequestDispatcher {
    RequestDispatcher::new(Logger::new("test"), 5_000).expect("client")
}

#[tokio::test]
async fn get_sends_bearer_and_query_and_decodes_json() {
    let stub = StubServer::start(200, r#"{"droplet":{"id":42}}"#).await;
    let list = endpoint(json!({
        "path": "/v2/droplets",
        "method": "GET",
        "operationId": "droplets_list",
        "parameters": [{ "name": "per_page", "in": "query" }]
    }));
    let config = ApiConfig::new("secret-token", Some(stub.base_url.clone()));

    let data = dispatcher()
        .call(&list, &params(json!({"per_page": 5})), &config)
        .await
        .expect("success");
    assert_eq!(data, json!({"droplet": {"id": 42}}));

    let seen = stub.received().await;
    assert_eq!(seen.request_line, "GET /v2/droplets?per_page=5 HTTP/1.1");
    assert_eq!(seen.header("authorization"), Some("Bearer secret-token"));
    assert_eq!(seen.header("accept"), Some("application/json"));
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn post_sends_routed_body_and_substituted_path() {
    let stub = StubServer::start(202, r#"{"action":{"status":"in-progress"}}"#).await;
    let action = endpoint(json!({
        "path": "/v2/droplets/{droplet_id}/actions",
        "method": "POST",
        "operationId": "dropletActions_post",
        "parameters": [
            { "name": "droplet_id", "in": "path", "required": true },
            { "name": "type", "in": "body", "required": true }
        ]
    }));
    let config = ApiConfig::new("t", Some(format!("{}/", stub.base_url)));

    let data = dispatcher()
        .call(
            &action,
            &params(json!({"droplet_id": 7, "type": "reboot", "ignored": true})),
            &config,
        )
        .await
        .expect("success");
    assert_eq!(data["action"]["status"], "in-progress");

    let seen = stub.received().await;
    assert_eq!(seen.request_line, "POST /v2/droplets/7/actions HTTP/1.1");
    assert_eq!(seen.header("content-type"), Some("application/json"));
    let body: Value = serde_json::from_str(&seen.body).expect("json body");
    assert_eq!(body, json!({"type": "reboot"}));
}

#[tokio::test]
async fn error_status_uses_server_message() {
    let stub = StubServer::start(404, r#"{"id":"not_found","message":"not found"}"#).await;
    let get = endpoint(json!({
        "path": "/v2/droplets/{droplet_id}",
        "method": "GET",
        "operationId": "droplets_get",
        "parameters": [{ "name": "droplet_id", "in": "path", "required": true }]
    }));
    let config = ApiConfig::new("t", Some(stub.base_url.clone()));

    let err = dispatcher()
        .call(&get, &params(json!({"droplet_id": 1})), &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Api);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message, "API Error: 404 - not found");
    assert_eq!(err.to_report(), "Error: API Error: 404 - not found");
    let _ = stub.received().await;
}

#[tokio::test]
async fn error_status_without_message_falls_back_to_status_text() {
    let stub = StubServer::start(500, "").await;
    let account = endpoint(json!({
        "path": "/v2/account",
        "method": "GET",
        "operationId": "account_get"
    }));
    let config = ApiConfig::new("t", Some(stub.base_url.clone()));

    let err = dispatcher()
        .call(&account, &ParameterMap::new(), &config)
        .await
        .unwrap_err();
    assert_eq!(
        err.message,
        "API Error: 500 - Request failed with status code 500"
    );
    let _ = stub.received().await;
}

#[tokio::test]
async fn empty_success_body_decodes_to_null() {
    let stub = StubServer::start(204, "").await;
    let delete = endpoint(json!({
        "path": "/v2/tags/{tag_id}",
        "method": "DELETE",
        "operationId": "tags_delete",
        "parameters": [{ "name": "tag_id", "in": "path" }]
    }));
    let config = ApiConfig::new("t", Some(stub.base_url.clone()));

    let data = dispatcher()
        .call(&delete, &params(json!({"tag_id": "web servers"})), &config)
        .await
        .expect("success");
    assert_eq!(data, Value::Null);

    let seen = stub.received().await;
    assert_eq!(seen.request_line, "DELETE /v2/tags/web%20servers HTTP/1.1");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let account = endpoint(json!({
        "path": "/v2/account",
        "method": "GET",
        "operationId": "account_get"
    }));
    let config = ApiConfig::new("t", Some(closed_base_url().await));

    let err = dispatcher()
        .call(&account, &ParameterMap::new(), &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Transport);
    assert!(err.status().is_none());
    assert!(err.to_report().starts_with("Error: "));
}

#[tokio::test]
async fn non_http_base_url_is_rejected_before_sending() {
    let account = endpoint(json!({
        "path": "/v2/account",
        "method": "GET",
        "operationId": "account_get"
    }));
    let config = ApiConfig::new("t", Some("ftp://example.com".to_string()));

    let err = dispatcher()
        .call(&account, &ParameterMap::new(), &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
}
