//! Database layer - connection pool, schema, seed data and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - All list operations use JOINs - no N+1 queries
//! - Rely on DB constraints and conditional writes - no check-then-insert
//! - Transactions for multi-table operations

pub mod pool;
pub mod migrations;
pub mod seed;
pub mod repos;

pub use pool::{create_memory_pool, create_pool, create_pool_with_options, DEFAULT_DATABASE_URL};
pub use repos::*;
