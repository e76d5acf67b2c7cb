//! API Module
//!
//! HTTP handlers and routing.
//!
//! # Endpoints
//! - `POST /products`, `GET /products`, `GET /products/:id`
//! - `POST /users`, `GET /users`, `GET /users/:id`
//! - `POST /cache`, `GET /cache/:key`, `DELETE /cache/:key`
//! - `GET /stats`, `GET /health`, `GET /time`, `GET /`

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{ApiJson, ApiPath};
pub use handlers::*;
pub use routes::create_router;
