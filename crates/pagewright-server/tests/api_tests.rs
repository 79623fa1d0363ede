use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pagewright_server::{AppState, config::ServerConfig, create_router, seed};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let state = AppState::from_config(ServerConfig::default()).await.unwrap();
    seed::seed_demo(&state.repository).await.unwrap();
    create_router(state).unwrap()
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_section_catalogue() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/api/sections", None).await;
    assert_eq!(status, StatusCode::OK);

    let types: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["courses", "faculty", "hero", "richText", "testimonials", "timeline"]);
    assert_eq!(body[2]["defaultProps"]["title"], "Your headline here");
}

#[tokio::test]
async fn test_get_missing_page_is_404() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/api/pages/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_render_demo_page() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/api/pages/home/render", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(body["summary"]["rendered"], 6);
    assert_eq!(body["nodes"][0]["identity"], "section:hero");
}

#[tokio::test]
async fn test_put_cms_record_then_render_unknown_type() {
    let app = app().await;
    let record = json!({
        "_id": "events",
        "title": "Events",
        "content": [
            {"_key": "a", "_type": "hero", "title": "Open day"},
            {"_key": "b", "_type": "unknown-widget", "size": 3}
        ]
    });

    let (status, page) = call(&app, "PUT", "/api/pages/events", Some(record)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["revision"], 1);
    assert_eq!(page["sections"][1]["props"]["size"], 3);

    let (status, body) = call(&app, "GET", "/api/pages/events/render", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"][1]["kind"], "unsupported");
    assert_eq!(body["nodes"][1]["sectionType"], "unknown-widget");
    assert_eq!(body["summary"]["unsupported"], 1);
}

#[tokio::test]
async fn test_put_malformed_record_is_400() {
    let app = app().await;
    let (status, _) = call(
        &app,
        "PUT",
        "/api/pages/bad",
        Some(json!({"sections": [{"key": "a"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_edits_commit() {
    let app = app().await;
    let ops = json!([
        {"op": "move", "key": "about", "to": 0},
        {"op": "remove", "key": "voices"},
        {"op": "add", "type": "richText", "props": {"body": "Closing words."}}
    ]);

    let (status, page) = call(&app, "POST", "/api/pages/home/edits", Some(ops)).await;
    assert_eq!(status, StatusCode::OK);
    let sections = page["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 6);
    assert_eq!(sections[0]["key"], "about");
    assert_eq!(sections[5]["props"]["body"], "Closing words.");
    assert_eq!(page["revision"], 2);

    let (_, stored) = call(&app, "GET", "/api/pages/home", None).await;
    assert_eq!(stored, page);
}

#[tokio::test]
async fn test_rejected_edit_is_422_and_not_saved() {
    let app = app().await;
    let ops = json!([
        {"op": "remove", "key": "hero"},
        {"op": "add", "type": "carousel"}
    ]);

    let (status, _) = call(&app, "POST", "/api/pages/home/edits", Some(ops)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, stored) = call(&app, "GET", "/api/pages/home", None).await;
    assert_eq!(stored["sections"][0]["key"], "hero");
    assert_eq!(stored["revision"], 1);
}

#[tokio::test]
async fn test_edits_on_missing_page_are_404() {
    let app = app().await;
    let (status, _) = call(&app, "POST", "/api/pages/nope/edits", Some(json!([]))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_storage_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        storage_dir: Some(dir.path().to_path_buf()),
        ..ServerConfig::default()
    };
    let state = AppState::from_config(config).await.unwrap();
    seed::seed_demo(&state.repository).await.unwrap();
    seed::seed_demo(&state.repository).await.unwrap();

    let page = state
        .repository
        .get_by_id(&pagewright::PageId::from("home"))
        .await
        .unwrap();
    assert_eq!(page.revision, 1);
    assert!(dir.path().join("refs/pages/home").exists());
}
