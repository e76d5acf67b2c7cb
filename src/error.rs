//! Error types for the record services
//!
//! Provides unified error handling using thiserror. Cache and store failures
//! have their own enums so the orchestrator can decide which ones to recover;
//! `ServiceError` is the outcome surfaced to callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Service Error Enum ==
/// Outcome codes surfaced to callers of the orchestrators and endpoints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Missing or malformed required field
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No entity or key at that identity
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violated, via lookaside cache or durable constraint
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Durable store or cache store failure not classified above
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Cache Error Enum ==
/// Failures of a cache backend. Distinct from a plain miss (`Ok(None)`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Backend unreachable or the command failed
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Key or payload violates the store limits
    #[error("Cache rejected write: {0}")]
    Rejected(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    Full(String),
}

// == Store Error Enum ==
/// Failures of the durable record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Connection or pool failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other query failure
    #[error("Store query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::ConstraintViolation(db.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

// == Codec Error ==
/// Payload could not be encoded or decoded.
#[derive(Error, Debug)]
#[error("Codec error: {0}")]
pub struct CodecError(#[from] pub serde_json::Error);

// == Conversions ==
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Rejected(msg) => ServiceError::InvalidArgument(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<CodecError> for ServiceError {
    fn from(err: CodecError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Result type for cache backends.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Result type for record stores.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
