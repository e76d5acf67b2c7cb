//! Entity types and the request/response DTOs of the HTTP surface.

pub mod entity;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use entity::{Entity, NewProduct, NewUser, Product, UniqueKey, User};
pub use requests::{CreateProductRequest, CreateUserRequest, SetRequest};
pub use responses::{
    GetResponse, HealthResponse, MemoryCacheStatsResponse, MessageResponse, StatsResponse,
    TimeResponse,
};
