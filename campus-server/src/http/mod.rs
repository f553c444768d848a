//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Bearer-token authentication
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_app, build_router, run_server, App, AppState, ServerConfig, ServerError};
pub use error::ApiError;
pub use extractors::{AuthUser, ValidId};
