//! SQLite-backed record store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use crate::error::StoreResult;
use crate::models::{NewProduct, NewUser, Product, User};
use crate::store::RecordStore;

const MAX_CONNECTIONS: u32 = 10;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable store for products and users.
///
/// Each `create` runs in its own transaction; dropping the transaction on an
/// error path rolls it back.
#[derive(Debug, Clone)]
pub struct SqlRecordStore {
    pool: SqlitePool,
}

impl SqlRecordStore {
    /// Opens a pool for `url`, creating the database file if missing.
    ///
    /// In-memory databases live and die with their connection, so they get
    /// a single connection that is never recycled.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(in_memory = in_memory, "Record store connected");

        Ok(Self { pool })
    }

    /// Fresh in-memory store with the schema in place.
    pub async fn in_memory() -> StoreResult<Self> {
        let store = Self::connect("sqlite::memory:").await?;
        store.bootstrap().await?;
        Ok(store)
    }

    /// Creates the record tables if needed.
    pub async fn bootstrap(&self) -> StoreResult<()> {
        super::schema::bootstrap(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore<Product> for SqlRecordStore {
    async fn create(&self, draft: NewProduct) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, price, created_at) VALUES (?, ?, ?, ?)
             RETURNING id, name, description, price, created_at",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = product.id, "Product row inserted");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, created_at FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_all(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, created_at FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

#[async_trait]
impl RecordStore<User> for SqlRecordStore {
    async fn create(&self, draft: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, created_at) VALUES (?, ?, ?)
             RETURNING id, username, email, created_at",
        )
        .bind(&draft.username)
        .bind(&draft.email)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = user.id, "User row inserted");
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_all(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
