//! Integration tests for the dev scaffolding endpoints

use axum::http::StatusCode;
use axum_test::TestServer;
use grails_scaffold::handlers::{router, DevState};
use grails_scaffold::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

fn test_server(store: Arc<MemoryStore>) -> TestServer {
    let state = DevState::new(ScaffoldConfig::default(), store);
    TestServer::new(router(state)).unwrap()
}

fn order_item_body() -> Value {
    json!({
        "scaffoldData": {
            "tableName": "order_item",
            "refTableName": "",
            "fields": [
                {"name": "quantity", "type": "INT"},
                {"name": "price", "type": "DECIMAL"}
            ]
        }
    })
}

#[tokio::test]
async fn test_list_models_empty() {
    let server = test_server(Arc::new(MemoryStore::new()));

    let response = server.get("/dev/models").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "models": [] }));
}

#[tokio::test]
async fn test_scaffold_then_list() {
    let store = Arc::new(MemoryStore::new());
    let server = test_server(Arc::clone(&store));

    let response = server.post("/dev").json(&order_item_body()).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["action"], "migrate");
    assert_eq!(body["actionParam"], "order_item");
    assert!(body["message"].as_str().unwrap().contains("OrderItem"));

    assert!(store.exists(Path::new("models/order_item.go")));

    let response = server.get("/dev/models").await;
    response.assert_json(&json!({ "models": ["OrderItem"] }));
}

#[tokio::test]
async fn test_duplicate_entity_conflict() {
    let server = test_server(Arc::new(MemoryStore::new()));

    server.post("/dev").json(&order_item_body()).await.assert_status_ok();

    let response = server.post("/dev").json(&order_item_body()).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("OrderItem"));

    let mut replace = order_item_body();
    replace["replace"] = json!(true);
    server.post("/dev").json(&replace).await.assert_status_ok();
}

#[tokio::test]
async fn test_invalid_identifier_bad_request() {
    let server = test_server(Arc::new(MemoryStore::new()));

    let response = server
        .post("/dev")
        .json(&json!({
            "scaffoldData": {"tableName": "order-item", "fields": []}
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("order-item"));
}

#[tokio::test]
async fn test_unparseable_body_bad_request() {
    let server = test_server(Arc::new(MemoryStore::new()));

    let response = server.post("/dev").json(&json!({"tableName": "post"})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_artifact_server_error() {
    let store = Arc::new(MemoryStore::with_files([(
        "internals/routes.go",
        "package internals\n",
    )]));
    let server = test_server(Arc::clone(&store));

    let response = server.post("/dev").json(&order_item_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.paths().len(), 1);
}

#[tokio::test]
async fn test_reserved_table_name_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let server = test_server(Arc::clone(&store));

    let response = server
        .post("/dev")
        .json(&json!({
            "scaffoldData": {"tableName": "handlers", "fields": [{"name": "name", "type": "TEXT"}]}
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("reserved"));
    assert!(store.paths().is_empty());
}
