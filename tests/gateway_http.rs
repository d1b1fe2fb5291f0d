//! Integration tests for the local gateway HTTP endpoints.
//!
//! These tests drive the router end to end over a JSON file store:
//! 1. Listing, creating, updating and deleting through HTTP
//! 2. Error statuses and bodies
//! 3. The facade's gateway path against a live server

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use newsroom::adapters::gateway::HttpGatewayClient;
use newsroom::adapters::http::{gateway_routes, GatewayState};
use newsroom::adapters::storage::JsonFileStore;
use newsroom::application::{ClientManager, ClientSlot, RecordService, ResourceFacade};
use newsroom::domain::foundation::PublishStatus;
use newsroom::domain::{Article, BackendSelector, DeploymentSignals, Event};
use newsroom::ports::GatewayApi;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(dir: &TempDir) -> Router {
    let store = Arc::new(JsonFileStore::new(dir.path()));
    gateway_routes(GatewayState::new(Arc::new(RecordService::new(store))))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_article(app: &Router, title: &str, status: &str) -> Value {
    let (code, body) = send(
        app,
        "POST",
        "/api/articles",
        Some(json!({ "title": title, "content": "Body", "status": status })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    body
}

// =============================================================================
// Records over HTTP
// =============================================================================

#[tokio::test]
async fn first_read_creates_empty_file() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, "GET", "/api/events", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let on_disk = std::fs::read_to_string(dir.path().join("events.json")).unwrap();
    assert_eq!(on_disk.trim(), "[]");
}

#[tokio::test]
async fn create_returns_record_in_public_shape() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let created = create_article(&app, "Hello", "published").await;

    assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(created["title"], "Hello");
    assert_eq!(created["createdAt"], created["updatedAt"]);
}

#[tokio::test]
async fn public_listing_filters_by_status() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    create_article(&app, "Visible", "published").await;
    create_article(&app, "Hidden", "draft").await;

    let (_, published) = send(&app, "GET", "/api/articles?status=published", None).await;
    let (_, everything) = send(&app, "GET", "/api/articles", None).await;
    let (status, unknown) = send(&app, "GET", "/api/articles?status=archived", None).await;

    assert_eq!(published.as_array().unwrap().len(), 1);
    assert_eq!(published[0]["title"], "Visible");
    assert_eq!(everything.as_array().unwrap().len(), 2);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, json!([]));
}

#[tokio::test]
async fn events_list_soonest_first_and_admin_latest_first() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    for (title, start) in [
        ("June", "2025-06-01T18:00:00Z"),
        ("January", "2025-01-15T18:00:00Z"),
    ] {
        let (code, _) = send(
            &app,
            "POST",
            "/api/events",
            Some(json!({ "title": title, "startDate": start, "status": "published" })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (_, public) = send(&app, "GET", "/api/events?status=published", None).await;
    let (_, admin) = send(&app, "GET", "/api/admin/events", None).await;

    assert_eq!(public[0]["title"], "January");
    assert_eq!(admin[0]["title"], "June");
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_creation_time() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let created = create_article(&app, "Hello", "draft").await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/articles/{}", id),
        Some(json!({ "title": "Hello again", "content": "New body", "status": "published" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], "Hello again");
    assert_eq!(updated["status"], "published");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn update_with_incomplete_body_is_rejected_and_leaves_record_untouched() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let article = create_article(&app, "Hello", "draft").await;
    let (code, event) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "title": "Meetup", "startDate": "2025-05-01T18:00:00Z", "status": "draft" })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);

    let (empty_body, body) = send(
        &app,
        "PUT",
        &format!("/api/articles/{}", article["id"].as_str().unwrap()),
        Some(json!({})),
    )
    .await;
    let (status_only, _) = send(
        &app,
        "PUT",
        &format!("/api/events/{}", event["id"].as_str().unwrap()),
        Some(json!({ "status": "published" })),
    )
    .await;

    assert_eq!(empty_body, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(status_only, StatusCode::BAD_REQUEST);
    let (_, articles) = send(&app, "GET", "/api/articles", None).await;
    let (_, events) = send(&app, "GET", "/api/events", None).await;
    assert_eq!(articles[0], article);
    assert_eq!(events[0], event);
}

#[tokio::test]
async fn delete_removes_record_then_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let created = create_article(&app, "Hello", "draft").await;
    let uri = format!("/api/articles/{}", created["id"].as_str().unwrap());

    let (first, _) = send(&app, "DELETE", &uri, None).await;
    let (second, body) = send(&app, "DELETE", &uri, None).await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn invalid_bodies_are_bad_requests() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (missing_title, body) = send(
        &app,
        "POST",
        "/api/articles",
        Some(json!({ "content": "Body", "status": "draft" })),
    )
    .await;
    let (backwards, _) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({
            "title": "Backwards",
            "startDate": "2025-01-02T00:00:00Z",
            "endDate": "2025-01-01T00:00:00Z",
            "status": "draft"
        })),
    )
    .await;

    assert_eq!(missing_title, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(backwards, StatusCode::BAD_REQUEST);
    let (_, events) = send(&app, "GET", "/api/events", None).await;
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn corrupt_file_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("articles.json"), "{ not json").unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, "GET", "/api/articles", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn records_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    create_article(&app(&dir), "Durable", "published").await;

    let (_, listed) = send(&app(&dir), "GET", "/api/articles", None).await;

    assert_eq!(listed[0]["title"], "Durable");
}

// =============================================================================
// Facade gateway path against a live server
// =============================================================================

async fn serve(dir: &TempDir) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app(dir);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn gateway_facade<R: newsroom::domain::Resource>(base_url: &str) -> ResourceFacade<R> {
    let gateway: Arc<dyn GatewayApi> =
        Arc::new(HttpGatewayClient::new(base_url, Duration::from_secs(5)).unwrap());
    ResourceFacade::new(
        Arc::new(ClientManager::unconfigured(Arc::new(ClientSlot::new()))),
        BackendSelector::new(DeploymentSignals::detect("localhost", "/events.html")),
        Some(gateway),
    )
}

#[tokio::test]
async fn facade_reads_and_pages_through_gateway() {
    let dir = TempDir::new().unwrap();
    let base_url = serve(&dir).await;
    let client = reqwest::Client::new();
    for day in 1..=5 {
        let response = client
            .post(format!("{}/api/events", base_url))
            .json(&json!({
                "title": format!("Day {}", day),
                "startDate": format!("2025-03-0{}T10:00:00Z", day),
                "status": if day == 5 { "draft" } else { "published" },
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let events = gateway_facade::<Event>(&base_url);
    let listed = events.list(Some(PublishStatus::Published)).await.unwrap();
    let page = events
        .get_page(Some(PublishStatus::Published), 2, 3)
        .await
        .unwrap();

    let titles: Vec<_> = listed.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Day 1", "Day 2", "Day 3", "Day 4"]);
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Day 4");
}

#[tokio::test]
async fn gateway_client_surfaces_error_status() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("articles.json"), "oops").unwrap();
    let base_url = serve(&dir).await;

    let result = gateway_facade::<Article>(&base_url).list(None).await;

    assert!(matches!(
        result,
        Err(newsroom::application::AccessError::BackendFailure(_))
    ));
}
