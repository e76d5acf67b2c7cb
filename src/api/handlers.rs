//! API Handlers
//!
//! HTTP request handlers for the record services and the key/value endpoint.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::extract::{ApiJson, ApiPath};
use crate::aside::{CacheAside, CachePolicy};
use crate::cache::{CacheStore, MemoryCacheStore, RedisCacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::kv::KvEndpoint;
use crate::models::{
    CreateProductRequest, CreateUserRequest, GetResponse, HealthResponse, MessageResponse,
    Product, SetRequest, StatsResponse, TimeResponse, User,
};
use crate::store::SqlRecordStore;

/// Application state shared across all handlers.
///
/// Every collaborator is constructed once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<CacheAside<Product>>,
    pub users: Arc<CacheAside<User>>,
    pub kv: Arc<KvEndpoint>,
    /// Set when the in-memory backend is in use, for stats and the sweep task
    pub memory_cache: Option<Arc<MemoryCacheStore>>,
}

impl AppState {
    /// Wires orchestrators and the key/value endpoint over shared stores.
    pub fn new(
        cache: Arc<dyn CacheStore>,
        records: Arc<SqlRecordStore>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            products: Arc::new(CacheAside::<Product>::new(
                cache.clone(),
                records.clone(),
                policy,
            )),
            users: Arc::new(CacheAside::<User>::new(cache.clone(), records, policy)),
            kv: Arc::new(KvEndpoint::new(cache)),
            memory_cache: None,
        }
    }

    /// Same as [`new`](Self::new) over an in-memory cache, which stays
    /// reachable for stats and cleanup.
    pub fn with_memory_cache(
        cache: Arc<MemoryCacheStore>,
        records: Arc<SqlRecordStore>,
        policy: CachePolicy,
    ) -> Self {
        let mut state = Self::new(cache.clone(), records, policy);
        state.memory_cache = Some(cache);
        state
    }

    /// Connects the record store, bootstraps its schema and picks the cache
    /// backend from configuration.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let records = SqlRecordStore::connect(&config.database_url)
            .await
            .context("connecting record store")?;
        records
            .bootstrap()
            .await
            .context("bootstrapping record schema")?;
        let records = Arc::new(records);

        let state = match &config.cache_url {
            Some(url) => {
                let cache = RedisCacheStore::new(url).context("opening Redis cache")?;
                info!("Using Redis cache backend");
                Self::new(Arc::new(cache), records, config.policy())
            }
            None => {
                info!(max_entries = config.max_entries, "Using in-memory cache backend");
                let cache = Arc::new(MemoryCacheStore::new(config.max_entries));
                Self::with_memory_cache(cache, records, config.policy())
            }
        };

        Ok(state)
    }
}

// == Products ==

/// Handler for POST /products
pub async fn create_product_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = req.into_draft()?;
    let product = state.products.create(draft).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Product>> {
    Ok(Json(state.products.read_by_id(id).await?))
}

/// Handler for GET /products
pub async fn list_products_handler(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products.read_all().await?))
}

// == Users ==

/// Handler for POST /users
pub async fn create_user_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let draft = req.into_draft()?;
    let user = state.users.create(draft).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<User>> {
    Ok(Json(state.users.read_by_id(id).await?))
}

/// Handler for GET /users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.read_all().await?))
}

// == Key/Value ==

/// Handler for POST /cache
pub async fn set_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SetRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let key = req.key.as_deref();
    let value = req.value.as_deref();
    state.kv.create(key, value).await?;

    let message = MessageResponse::set(key.unwrap_or_default(), value.unwrap_or_default());
    Ok((StatusCode::CREATED, Json(message)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<GetResponse>> {
    let value = state.kv.read(&key).await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<MessageResponse>> {
    state.kv.delete(&key).await?;

    Ok(Json(MessageResponse::deleted(&key)))
}

// == Operational ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let memory_cache = match &state.memory_cache {
        Some(cache) => Some(cache.stats().await.into()),
        None => None,
    };

    Json(StatsResponse {
        products: state.products.stats(),
        users: state.users.stats(),
        memory_cache,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /
pub async fn home_handler() -> Json<MessageResponse> {
    Json(MessageResponse::welcome())
}

/// Handler for GET /time
pub async fn time_handler() -> Json<TimeResponse> {
    Json(TimeResponse::now())
}
