use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use daybook::api;
use daybook::db::Database;

// Builds a router over a fresh in-memory database
fn test_app() -> Router {
    let db = Database::in_memory().unwrap();
    db.initialize_schema().unwrap();
    api::router(db)
}

// Sends one request through the router and decodes the JSON response body
async fn request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::PUT, uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, Method::DELETE, uri, None).await
}

// Creates a minimal entry and returns the stored representation
async fn create_entry(app: &Router, date: &str, content: &str) -> Value {
    let (status, body) = post(app, "/api/entries", json!({ "date": date, "content": content })).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let app = test_app();

    let (status, body) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn test_create_entry_returns_created() {
    let app = test_app();

    let (status, body) = post(
        &app,
        "/api/entries",
        json!({
            "date": "2024-03-01",
            "title": "Trip",
            "content": "Went hiking",
            "mood": "happy",
            "tags": ["travel", "alps"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["title"], "Trip");
    assert_eq!(body["content"], "Went hiking");
    assert_eq!(body["mood"], "happy");
    assert_eq!(body["tags"], json!(["travel", "alps"]));
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn test_create_entry_applies_defaults() {
    let app = test_app();

    let body = create_entry(&app, "2024-03-01", "just content").await;

    assert_eq!(body["title"], "");
    assert_eq!(body["mood"], "neutral");
    assert_eq!(body["tags"], json!([]));
}

#[tokio::test]
async fn test_create_entry_accepts_comma_separated_tags() {
    let app = test_app();

    let (status, body) = post(
        &app,
        "/api/entries",
        json!({ "date": "2024-03-01", "content": "tagged", "tags": "a, b ,, c " }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tags"], json!(["a", "b", "c"]));
}

#[tokio::test]
async fn test_create_entry_requires_date_and_content() {
    let app = test_app();

    for payload in [
        json!({}),
        json!({ "date": "2024-03-01" }),
        json!({ "content": "no date" }),
        json!({ "date": "", "content": "" }),
    ] {
        let (status, body) = post(&app, "/api/entries", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "date and content are required" }));
    }
}

#[tokio::test]
async fn test_create_entry_rejects_invalid_date() {
    let app = test_app();

    let (status, body) = post(
        &app,
        "/api/entries",
        json!({ "date": "junk", "content": "x" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid date 'junk'" }));
}

#[tokio::test]
async fn test_create_entry_rejects_invalid_mood() {
    let app = test_app();

    let (status, body) = post(
        &app,
        "/api/entries",
        json!({ "date": "2024-03-01", "content": "x", "mood": "grumpy" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("grumpy"));
    assert!(message.contains("neutral"));
}

#[tokio::test]
async fn test_create_entry_normalizes_timestamp_to_utc_day() {
    let app = test_app();

    // 23:30 at UTC-5 is 04:30 UTC the next day
    let body = create_entry(&app, "2024-03-01T23:30:00-05:00", "late night").await;
    assert_eq!(body["date"], "2024-03-02");
}

#[tokio::test]
async fn test_month_listing_filters_and_sorts() {
    let app = test_app();

    create_entry(&app, "2024-03-15", "mid March").await;
    create_entry(&app, "2024-02-29", "leap day").await;
    create_entry(&app, "2024-03-01", "early March").await;
    create_entry(&app, "2024-04-01", "April").await;

    let (status, body) = get(&app, "/api/entries/month?year=2024&month=3").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["date"], "2024-03-01");
    assert_eq!(entries[1]["date"], "2024-03-15");
}

#[tokio::test]
async fn test_month_listing_requires_year_and_month() {
    let app = test_app();

    for uri in [
        "/api/entries/month",
        "/api/entries/month?year=2024",
        "/api/entries/month?month=3",
        "/api/entries/month?year=&month=3",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "year and month are required" }));
    }
}

#[tokio::test]
async fn test_month_listing_rejects_invalid_values() {
    let app = test_app();

    for uri in [
        "/api/entries/month?year=abc&month=3",
        "/api/entries/month?year=2024&month=abc",
        "/api/entries/month?year=2024&month=13",
        "/api/entries/month?year=2024&month=0",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "invalid year or month" }));
    }
}

#[tokio::test]
async fn test_date_listing_returns_only_that_day() {
    let app = test_app();

    let first = create_entry(&app, "2024-03-01", "first").await;
    let second = create_entry(&app, "2024-03-01", "second").await;
    create_entry(&app, "2024-03-02", "other day").await;

    let (status, body) = get(&app, "/api/entries?date=2024-03-01").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Creation order within the day
    assert_eq!(entries[0]["id"], first["id"]);
    assert_eq!(entries[1]["id"], second["id"]);
}

#[tokio::test]
async fn test_date_listing_requires_date() {
    let app = test_app();

    let (status, body) = get(&app, "/api/entries").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "date is required" }));
}

#[tokio::test]
async fn test_date_listing_rejects_invalid_date() {
    let app = test_app();

    let (status, body) = get(&app, "/api/entries?date=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid date 'nope'" }));
}

#[tokio::test]
async fn test_get_entry_by_id() {
    let app = test_app();

    let created = create_entry(&app, "2024-03-01", "find me").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = get(&app, &format!("/api/entries/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_missing_entry_is_not_found() {
    let app = test_app();

    let (status, body) = get(&app, "/api/entries/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_update_entry_changes_only_given_fields() {
    let app = test_app();

    let created = create_entry(&app, "2024-03-01", "original").await;
    let id = created["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, body) = put(
        &app,
        &format!("/api/entries/{}", id),
        json!({ "title": "Renamed", "mood": "excited" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["mood"], "excited");
    assert_eq!(body["content"], "original");
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["createdAt"], created["createdAt"]);
    assert!(body["updatedAt"].as_str().unwrap() > created["updatedAt"].as_str().unwrap());

    // The change is persisted
    let (status, stored) = get(&app, &format!("/api/entries/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_update_ignores_unknown_fields() {
    let app = test_app();

    let created = create_entry(&app, "2024-03-01", "keep my date").await;
    let id = created["id"].as_str().unwrap();

    // Clients may send the full form including the date; the date is immutable
    let (status, body) = put(
        &app,
        &format!("/api/entries/{}", id),
        json!({ "date": "2030-01-01", "title": "Renamed" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["title"], "Renamed");
}

#[tokio::test]
async fn test_update_missing_entry_is_not_found() {
    let app = test_app();

    let (status, body) = put(&app, "/api/entries/missing", json!({ "title": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_update_rejects_empty_content() {
    let app = test_app();

    let created = create_entry(&app, "2024-03-01", "has content").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = put(&app, &format!("/api/entries/{}", id), json!({ "content": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "content must not be empty" }));

    // Entry unchanged
    let (_, stored) = get(&app, &format!("/api/entries/{}", id)).await;
    assert_eq!(stored["content"], "has content");
}

#[tokio::test]
async fn test_update_rejects_invalid_mood() {
    let app = test_app();

    let created = create_entry(&app, "2024-03-01", "moody").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = put(
        &app,
        &format!("/api/entries/{}", id),
        json!({ "mood": "grumpy" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("grumpy"));
}

#[tokio::test]
async fn test_delete_entry_flow() {
    let app = test_app();

    let created = create_entry(&app, "2024-03-01", "short lived").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = delete(&app, &format!("/api/entries/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, _) = get(&app, &format!("/api/entries/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&app, "/api/entries/month?year=2024&month=3").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_missing_entry_is_not_found() {
    let app = test_app();

    let (status, body) = delete(&app, "/api/entries/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_entry_lifecycle_through_month_view() {
    let app = test_app();

    // A fresh month is empty
    let (_, body) = get(&app, "/api/entries/month?year=2025&month=6").await;
    assert_eq!(body, json!([]));

    // Create, then the month view shows the entry
    let created = create_entry(&app, "2025-06-10", "hello").await;
    let id = created["id"].as_str().unwrap().to_string();

    let (_, body) = get(&app, "/api/entries/month?year=2025&month=6").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Edit, then the month view reflects the change
    let (status, _) = put(
        &app,
        &format!("/api/entries/{}", id),
        json!({ "title": "Hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/entries/month?year=2025&month=6").await;
    assert_eq!(body[0]["title"], "Hello");

    // Delete, then the month is empty again
    let (status, _) = delete(&app, &format!("/api/entries/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/entries/month?year=2025&month=6").await;
    assert_eq!(body, json!([]));
}
