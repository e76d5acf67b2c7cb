//! Entity types served by the record services
//!
//! Each entity kind declares its cache namespace and, optionally, the
//! intended-unique field used for the lookaside cache.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

// == Entity Trait ==
/// A durable record with a server-assigned id and creation timestamp.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Validated fields needed to create the entity.
    type Draft: Send + Sync + 'static;

    /// Cache key namespace, e.g. `product` in `product:42`.
    const KIND: &'static str;

    fn id(&self) -> i64;

    /// The intended-unique field of a draft, if this kind has a lookaside cache.
    fn unique_key(_draft: &Self::Draft) -> Option<UniqueKey> {
        None
    }
}

/// Name and value of an intended-unique field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

// == Product ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl Entity for Product {
    type Draft = NewProduct;
    const KIND: &'static str = "product";

    fn id(&self) -> i64 {
        self.id
    }
}

// == User ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl Entity for User {
    type Draft = NewUser;
    const KIND: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }

    fn unique_key(draft: &NewUser) -> Option<UniqueKey> {
        Some(UniqueKey {
            field: "email",
            value: draft.email.clone(),
        })
    }
}
