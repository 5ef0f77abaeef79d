//! # HTTP Server Module
//!
//! REST surface over the collection services.
//!
//! # Endpoints
//!
//! - `/{collection}` - list and create
//! - `/{collection}/{id}` - read, update, delete by opaque id
//! - `/counties/{state_code}/{name}` - same, by natural key
//! - `/hello`, `/health`, `/endpoints`, `/echo`, `/stats`

mod collection_routes;
mod config;
mod errors;
mod meta_routes;
mod server;

pub use collection_routes::{CreatedResponse, MessageResponse};
pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse, INTERNAL_ERROR_MESSAGE};
pub use meta_routes::{endpoint_paths, HealthResponse};
pub use server::HttpServer;
