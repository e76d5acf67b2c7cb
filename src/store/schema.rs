//! Schema bootstrap for the record tables.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// `AUTOINCREMENT` keeps ids from ever being reissued, even after the
/// highest row disappears.
const CREATE_PRODUCTS: &str = "
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        price REAL NOT NULL,
        created_at TEXT NOT NULL
    )";

const CREATE_USERS: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )";

const CREATE_PRODUCTS_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_name ON products (name)";

/// Creates the record tables if they do not exist yet. Idempotent.
pub async fn bootstrap(pool: &SqlitePool) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    for statement in [CREATE_PRODUCTS, CREATE_USERS, CREATE_PRODUCTS_NAME_INDEX] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Record schema ready");
    Ok(())
}
