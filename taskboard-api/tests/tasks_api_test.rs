/// Integration tests for the task endpoints
///
/// These drive the full router (middleware included) over in-memory
/// storage and cache:
/// - CRUD flow and status codes
/// - Cache-aside list behaviour and invalidation
/// - PUT requires both fields
/// - Error body shape

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use taskboard_shared::services::tasks::TASK_LIST_CACHE_KEY;

#[tokio::test]
async fn test_task_lifecycle() {
    let ctx = TestContext::new();

    let (status, task) = ctx
        .send("POST", "/tasks", Some(json!({ "description": "buy milk" })), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["description"], "buy milk");
    assert_eq!(task["completed"], false);
    assert!(task["id"].is_string());
    assert!(task["createdAt"].is_string());
    let id = task["id"].as_str().unwrap().to_string();

    let (status, list) = ctx.send("GET", "/tasks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().iter().any(|t| t["id"] == id.as_str()));

    let (status, fetched) = ctx.send("GET", &format!("/tasks/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, task);

    let (status, updated) = ctx
        .send(
            "PUT",
            &format!("/tasks/{}", id),
            Some(json!({ "description": "buy milk", "completed": true })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["id"], id.as_str());

    let (status, body) = ctx.send("DELETE", &format!("/tasks/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = ctx.send("GET", &format!("/tasks/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Tarefa não encontrada" }));
}

#[tokio::test]
async fn test_list_served_from_cache() {
    let ctx = TestContext::new();
    ctx.send("POST", "/tasks", Some(json!({ "description": "a" })), None).await;

    let (_, first) = ctx.send("GET", "/tasks", None, None).await;
    let (_, second) = ctx.send("GET", "/tasks", None, None).await;

    assert_eq!(first, second);
    assert_eq!(ctx.tasks.find_all_calls(), 1);
    assert!(ctx.cache.contains_key(TASK_LIST_CACHE_KEY));
}

#[tokio::test]
async fn test_writes_are_visible_immediately() {
    let ctx = TestContext::new();
    let (_, list) = ctx.send("GET", "/tasks", None, None).await;
    assert_eq!(list, json!([]));

    let (_, task) = ctx
        .send("POST", "/tasks", Some(json!({ "description": "a" })), None)
        .await;
    let (_, list) = ctx.send("GET", "/tasks", None, None).await;
    assert_eq!(list, json!([task]));

    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());
    let (_, updated) = ctx
        .send("PUT", &uri, Some(json!({ "description": "b", "completed": true })), None)
        .await;
    let (_, list) = ctx.send("GET", "/tasks", None, None).await;
    assert_eq!(list, json!([updated]));

    ctx.send("DELETE", &uri, None, None).await;
    let (_, list) = ctx.send("GET", "/tasks", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_requires_description() {
    let ctx = TestContext::new();

    for body in [json!({}), json!({ "description": "" }), json!({ "description": "   " })] {
        let (status, response) = ctx.send("POST", "/tasks", Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Descrição obrigatória" }));
    }
}

#[tokio::test]
async fn test_partial_put_rejected_and_record_untouched() {
    let ctx = TestContext::new();
    let (_, task) = ctx
        .send("POST", "/tasks", Some(json!({ "description": "keep me" })), None)
        .await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    for body in [
        json!({ "completed": true }),
        json!({ "description": "changed" }),
        json!({ "description": "", "completed": true }),
    ] {
        let (status, response) = ctx.send("PUT", &uri, Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Descrição e status são obrigatórios" }));
    }

    let (_, fetched) = ctx.send("GET", &uri, None, None).await;
    assert_eq!(fetched, task);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let ctx = TestContext::new();
    let missing = format!("/tasks/{}", uuid::Uuid::new_v4());

    let (status, _) = ctx.send("GET", &missing, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send("PUT", &missing, Some(json!({ "description": "x", "completed": false })), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send("DELETE", &missing, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.send("GET", "/tasks/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Tarefa não encontrada");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_root_and_health() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Hello World" }));

    let (status, body) = ctx.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["cache"], "connected");
}
