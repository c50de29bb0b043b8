use domain::{TodoRepository, TodoService};
use infrastructure::{Database, SqliteTodoRepository};
use rpc_gateway::{handle_request, ApiGatewayProxyRequest, Procedure, RpcGateway};
use serde_json::{json, Value};
use shared::AppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

async fn setup_gateway() -> RpcGateway<SqliteTodoRepository> {
    setup_with_database().await.0
}

async fn setup_with_database() -> (RpcGateway<SqliteTodoRepository>, Database) {
    let database = Database::in_memory()
        .await
        .expect("インメモリDBの作成に失敗");
    let repository = SqliteTodoRepository::from_database(&database);
    (RpcGateway::new(TodoService::new(repository)), database)
}

async fn row_count(gateway: &RpcGateway<SqliteTodoRepository>) -> i64 {
    gateway.service().repository().count().await.unwrap()
}

fn post(procedure: &str, body: Value) -> ApiGatewayProxyRequest {
    serde_json::from_value(json!({
        "httpMethod": "POST",
        "path": format!("/rpc/{procedure}"),
        "body": body.to_string(),
        "requestContext": { "requestId": "test-request" }
    }))
    .unwrap()
}

fn get(procedure: &str, input: Option<Value>) -> ApiGatewayProxyRequest {
    let query = input.map(|input| HashMap::from([("input".to_string(), input.to_string())]));
    ApiGatewayProxyRequest {
        http_method: "GET".to_string(),
        path: format!("/rpc/{procedure}"),
        query_string_parameters: query,
        ..Default::default()
    }
}

fn body_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let gateway = setup_gateway().await;

    let created = gateway
        .dispatch("create", json!({ "text": "Test todo item" }))
        .await
        .unwrap();

    assert_eq!(created["text"], "Test todo item");
    assert_eq!(created["completed"], false);
    assert!(created["id"].is_i64());
    assert!(created["created_at"].is_string());

    let fetched = gateway
        .dispatch("get", json!({ "id": created["id"] }))
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_id_returns_null() {
    let gateway = setup_gateway().await;

    let result = gateway.dispatch("get", json!({ "id": 999 })).await.unwrap();

    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_list_preserves_order() {
    let gateway = setup_gateway().await;
    assert_eq!(gateway.dispatch("list", json!({})).await.unwrap(), json!([]));

    for text in ["A", "B", "C"] {
        gateway
            .dispatch("create", json!({ "text": text }))
            .await
            .unwrap();
    }

    let listed = gateway.dispatch("list", json!({})).await.unwrap();
    let texts: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_schema_violations_are_validation_errors() {
    let gateway = setup_gateway().await;

    let cases = [
        (Procedure::Create, json!({})),
        (Procedure::Create, json!({ "text": "" })),
        (Procedure::Create, json!({ "text": "   " })),
        (Procedure::Create, json!({ "text": 42 })),
        (Procedure::Get, json!({ "id": "1" })),
        (Procedure::Get, json!({})),
        (Procedure::Update, json!({ "id": 1, "text": "" })),
        (Procedure::Update, json!({ "id": 1, "completed": "yes" })),
        (Procedure::Update, json!({ "id": 1, "text": null })),
        (Procedure::Delete, json!({ "id": 1.5 })),
        (Procedure::List, json!([])),
    ];

    for (procedure, input) in cases {
        let result = gateway.call(procedure, input.clone()).await;
        assert!(
            matches!(result, Err(AppError::Validation(_))),
            "expected validation error for {procedure} {input}, got {result:?}"
        );
    }

    assert_eq!(row_count(&gateway).await, 0);
}

#[tokio::test]
async fn test_update_merges_only_provided_fields() {
    let gateway = setup_gateway().await;
    let created = gateway
        .dispatch("create", json!({ "text": "Original todo" }))
        .await
        .unwrap();
    let id = created["id"].clone();

    let toggled = gateway
        .dispatch("update", json!({ "id": id, "completed": true }))
        .await
        .unwrap();
    assert_eq!(toggled["text"], "Original todo");
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["created_at"], created["created_at"]);

    let renamed = gateway
        .dispatch("update", json!({ "id": id, "text": "Updated todo text" }))
        .await
        .unwrap();
    assert_eq!(renamed["text"], "Updated todo text");
    assert_eq!(renamed["completed"], true);
    assert_eq!(renamed["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let gateway = setup_gateway().await;
    gateway
        .dispatch("create", json!({ "text": "A" }))
        .await
        .unwrap();

    let result = gateway
        .dispatch("update", json!({ "id": 999, "completed": true }))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(row_count(&gateway).await, 1);
}

#[tokio::test]
async fn test_delete_reports_success_flag() {
    let gateway = setup_gateway().await;
    let created = gateway
        .dispatch("create", json!({ "text": "Test todo to delete" }))
        .await
        .unwrap();

    let deleted = gateway
        .dispatch("delete", json!({ "id": created["id"] }))
        .await
        .unwrap();
    assert_eq!(deleted, json!({ "success": true }));

    let again = gateway
        .dispatch("delete", json!({ "id": created["id"] }))
        .await
        .unwrap();
    assert_eq!(again, json!({ "success": false }));
}

#[tokio::test]
async fn test_unknown_procedure() {
    let gateway = setup_gateway().await;

    let result = gateway.dispatch("archive", json!({})).await;

    assert!(matches!(result, Err(AppError::UnknownProcedure(_))));
}

#[tokio::test]
async fn test_http_post_success_envelope() {
    let gateway = setup_gateway().await;

    let response = handle_request(
        &gateway,
        &post("createTodo", json!({ "text": "buy milk" })),
        "test-request",
        false,
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers.get("Access-Control-Allow-Origin"),
        Some(&"*".to_string())
    );
    let body = body_json(&response.body);
    assert_eq!(body["data"]["text"], "buy milk");
}

#[tokio::test]
async fn test_http_get_query_with_input() {
    let gateway = setup_gateway().await;
    let created = gateway
        .dispatch("create", json!({ "text": "A" }))
        .await
        .unwrap();

    let response = handle_request(
        &gateway,
        &get("get", Some(json!({ "id": created["id"] }))),
        "req",
        false,
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(body_json(&response.body)["data"], created);

    let response = handle_request(&gateway, &get("list", None), "req", false).await;
    assert_eq!(response.status_code, 200);
    assert_eq!(body_json(&response.body)["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_http_get_mutation_is_rejected() {
    let gateway = setup_gateway().await;

    let response = handle_request(
        &gateway,
        &get("create", Some(json!({ "text": "A" }))),
        "req",
        false,
    )
    .await;

    assert_eq!(response.status_code, 405);
    assert_eq!(body_json(&response.body)["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(row_count(&gateway).await, 0);
}

#[tokio::test]
async fn test_http_error_responses_are_structured() {
    let gateway = setup_gateway().await;

    let validation = handle_request(
        &gateway,
        &post("create", json!({ "text": "" })),
        "req-1",
        true,
    )
    .await;
    assert_eq!(validation.status_code, 400);
    let body = body_json(&validation.body);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["request_id"], "req-1");
    assert!(body["details"].is_string());

    let not_found = handle_request(
        &gateway,
        &post("update", json!({ "id": 999, "text": "x" })),
        "req-2",
        false,
    )
    .await;
    assert_eq!(not_found.status_code, 404);
    let body = body_json(&not_found.body);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body.get("details").is_none());

    let unknown = handle_request(&gateway, &post("archive", json!({})), "req-3", false).await;
    assert_eq!(unknown.status_code, 404);
    assert_eq!(body_json(&unknown.body)["code"], "UNKNOWN_PROCEDURE");
}

#[tokio::test]
async fn test_http_options_preflight() {
    let gateway = setup_gateway().await;
    let request = ApiGatewayProxyRequest {
        http_method: "OPTIONS".to_string(),
        path: "/rpc/create".to_string(),
        ..Default::default()
    };

    let response = handle_request(&gateway, &request, "req", false).await;

    assert_eq!(response.status_code, 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_http_unsupported_method() {
    let gateway = setup_gateway().await;
    let request = ApiGatewayProxyRequest {
        http_method: "PUT".to_string(),
        path: "/rpc/update".to_string(),
        body: Some(json!({ "id": 1 }).to_string()),
        ..Default::default()
    };

    let response = handle_request(&gateway, &request, "req", false).await;

    assert_eq!(response.status_code, 405);
}

#[tokio::test]
async fn test_store_failure_becomes_structured_500() {
    let (gateway, database) = setup_with_database().await;
    sqlx::query("DROP TABLE todos")
        .execute(database.pool())
        .await
        .unwrap();

    let requests = [
        post("create", json!({ "text": "A" })),
        post("list", json!({})),
        post("update", json!({ "id": 1, "completed": true })),
        post("delete", json!({ "id": 1 })),
        get("get", Some(json!({ "id": 1 }))),
    ];

    for request in &requests {
        let response = handle_request(&gateway, request, "req-store", false).await;

        assert_eq!(response.status_code, 500, "path {}", request.path);
        let body = body_json(&response.body);
        assert_eq!(body["code"], "STORE_ERROR");
        assert_eq!(body["message"], "予期しないエラーが発生しました");
        assert_eq!(body["request_id"], "req-store");
        assert!(body.get("details").is_none());
        assert!(body.get("data").is_none());
    }
}

#[tokio::test]
async fn test_store_failure_details_when_enabled() {
    let (gateway, database) = setup_with_database().await;
    sqlx::query("DROP TABLE todos")
        .execute(database.pool())
        .await
        .unwrap();

    let result = gateway.dispatch("list", json!({})).await;
    assert!(matches!(result, Err(AppError::Store(_))));

    let response = handle_request(&gateway, &post("list", json!({})), "req", true).await;
    assert_eq!(response.status_code, 500);
    let details = body_json(&response.body)["details"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(details.contains("no such table"), "details: {details}");
}

#[tokio::test]
async fn test_schema_errors_name_the_procedure() {
    let gateway = setup_gateway().await;

    let result = gateway.dispatch("createTodo", json!({ "txt": "A" })).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ref m))
            if m.starts_with("Invalid input for 'create'") && m.contains("text")
    ));
}

#[tokio::test]
async fn test_http_base64_encoded_body() {
    let gateway = setup_gateway().await;
    let mut request = post("create", json!({}));
    request.body = Some(STANDARD.encode(json!({ "text": "encoded" }).to_string()));
    request.is_base64_encoded = true;

    let response = handle_request(&gateway, &request, "req", false).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(body_json(&response.body)["data"]["text"], "encoded");
}
