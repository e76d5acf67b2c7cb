//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_product_handler, create_user_handler, delete_handler, get_handler,
    get_product_handler, get_user_handler, health_handler, home_handler, list_products_handler,
    list_users_handler, set_handler, stats_handler, time_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/time", get(time_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route(
            "/products",
            post(create_product_handler).get(list_products_handler),
        )
        .route("/products/:id", get(get_product_handler))
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/users/:id", get(get_user_handler))
        .route("/cache", post(set_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aside::CachePolicy;
    use crate::cache::MemoryCacheStore;
    use crate::store::SqlRecordStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let records = Arc::new(SqlRecordStore::in_memory().await.unwrap());
        let cache = Arc::new(MemoryCacheStore::new(100));
        create_router(AppState::with_memory_cache(
            cache,
            records,
            CachePolicy::default(),
        ))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let app = create_test_app().await;

        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_operational_endpoints() {
        assert_eq!(status_of("/").await, StatusCode::OK);
        assert_eq!(status_of("/time").await, StatusCode::OK);
        assert_eq!(status_of("/health").await, StatusCode::OK);
        assert_eq!(status_of("/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_listings_start_empty() {
        assert_eq!(status_of("/products").await, StatusCode::OK);
        assert_eq!(status_of("/users").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_records_and_keys() {
        assert_eq!(status_of("/products/1").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/users/1").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/cache/nonexistent").await, StatusCode::NOT_FOUND);
    }

    async fn error_body(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_test_app().await.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_json_bad_request() {
        let request = Request::builder()
            .uri("/products/abc")
            .body(Body::empty())
            .unwrap();

        let (status, body) = error_body(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from("{\"username\": "))
            .unwrap();

        let (status, body) = error_body(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "Lamp", "price": "cheap"}"#))
            .unwrap();

        let (status, body) = error_body(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
