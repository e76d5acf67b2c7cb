//! Integration Tests for API Endpoints
//!
//! Drives the full router over an in-memory cache and an in-memory SQLite
//! record store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cachefront::{
    api::create_router, cache::MemoryCacheStore, store::SqlRecordStore, AppState, CachePolicy,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

async fn test_state(policy: CachePolicy) -> AppState {
    let records = Arc::new(SqlRecordStore::in_memory().await.unwrap());
    AppState::with_memory_cache(Arc::new(MemoryCacheStore::new(1000)), records, policy)
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
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

// == Users ==

#[tokio::test]
async fn test_user_scenario() {
    let state = test_state(CachePolicy::default()).await;
    let app = create_router(state.clone());

    let (status, created) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"username": "ana", "email": "ana@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["username"], "ana");

    let (status, fetched) = send(&app, "GET", "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    // Served from cache, no store round trip
    assert_eq!(state.users.stats().store_reads, 0);

    let (status, body) = send(&app, "GET", "/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_duplicate_user_is_conflict() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let user = json!({"username": "ana", "email": "ana@x.com"});
    let (status, _) = send(&app, "POST", "/users", Some(user)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"username": "other", "email": "ana@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "user already exists");
}

#[tokio::test]
async fn test_concurrent_user_creates() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let body = json!({"username": "ana", "email": "ana@x.com"});
    let (left, right) = tokio::join!(
        send(&app, "POST", "/users", Some(body.clone())),
        send(&app, "POST", "/users", Some(body)),
    );

    let mut statuses = vec![left.0.as_u16(), right.0.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 409]);
}

#[tokio::test]
async fn test_user_missing_fields_is_bad_request() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let (status, body) = send(&app, "POST", "/users", Some(json!({"username": "ana"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username and email required");
}

// == Products ==

#[tokio::test]
async fn test_product_create_and_read() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let (status, created) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Lamp", "description": "Desk lamp", "price": 19.99})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], 19.99);
    assert!(created["created_at"].is_string());

    let uri = format!("/products/{}", created["id"]);
    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = send(&app, "POST", "/products", Some(json!({"name": "Lamp"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_listing_is_a_snapshot_until_it_expires() {
    let policy = CachePolicy {
        collection_ttl: Duration::from_millis(200),
        ..CachePolicy::default()
    };
    let app = create_router(test_state(policy).await);

    send(&app, "POST", "/products", Some(json!({"name": "Lamp", "price": 19.99}))).await;

    let (status, first) = send(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.as_array().unwrap().len(), 1);

    send(&app, "POST", "/products", Some(json!({"name": "Desk", "price": 120.0}))).await;

    // Same snapshot, serialized identically
    let (_, second) = send(&app, "GET", "/products", None).await;
    assert_eq!(second.to_string(), first.to_string());

    // The new product is already readable by id
    let (status, _) = send(&app, "GET", "/products/2", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let (_, refreshed) = send(&app, "GET", "/products", None).await;
    assert_eq!(refreshed.as_array().unwrap().len(), 2);
}

// == Key/Value ==

#[tokio::test]
async fn test_cache_endpoint_lifecycle() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let (status, body) = send(&app, "POST", "/cache", Some(json!({"key": "k", "value": "v"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Key k set with value v");

    let (status, body) = send(&app, "GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"key": "k", "value": "v"}));

    let (status, body) = send(&app, "DELETE", "/cache/k", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Key k deleted");

    let (status, _) = send(&app, "DELETE", "/cache/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_endpoint_rejects_empty_value() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let (status, body) = send(&app, "POST", "/cache", Some(json!({"key": "k", "value": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "key and value required");

    let (status, _) = send(&app, "POST", "/cache", Some(json!({"value": "v"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_endpoint_cannot_shadow_records() {
    let app = create_router(test_state(CachePolicy::default()).await);

    let forged = json!({
        "id": 1,
        "name": "forged",
        "description": null,
        "price": -1.0,
        "created_at": "2024-01-01T00:00:00Z"
    });
    let (status, _) = send(
        &app,
        "POST",
        "/cache",
        Some(json!({"key": "product:1", "value": forged.to_string()})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "GET", "/products/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        "POST",
        "/cache",
        Some(json!({"key": "user:email:bob@x.com", "value": "x"})),
    )
    .await;

    let (status, created) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"username": "bob", "email": "bob@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "bob@x.com");

    let (status, body) = send(&app, "GET", "/cache/product:1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], forged.to_string());
}

// == Operational ==

#[tokio::test]
async fn test_stats_reports_orchestrator_counters() {
    let app = create_router(test_state(CachePolicy::default()).await);

    send(&app, "GET", "/products/1", None).await;

    let (status, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["products"]["cache_misses"], 1);
    assert_eq!(stats["products"]["store_reads"], 1);
    assert_eq!(stats["users"]["store_reads"], 0);
    assert!(stats["memory_cache"]["hit_rate"].is_number());
}
