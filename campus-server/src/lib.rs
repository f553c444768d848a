//! campus-server: HTTP backend for campus resource booking
//!
//! Users sign up and log in for a bearer token, manage bookable resources
//! (rooms, halls, equipment) and reserve non-overlapping time slots on them.
//!
//! Layers, bottom-up:
//! - [`models`]: validated newtypes, status enums, time slots, free windows
//! - [`auth`]: Argon2 password hashing and HS256 bearer tokens
//! - [`db`]: SQLite pool, migrations, seed data and repositories
//! - [`http`]: Axum router, extractors and JSON error mapping

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use auth::{TokenKeys, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};
pub use db::{create_pool, DbError, DEFAULT_DATABASE_URL};
pub use http::{
    build_app, build_router, run_server, ApiError, App, AppState, ServerConfig, ServerError,
};
