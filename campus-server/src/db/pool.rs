//! Database connection pool management
//!
//! Uses sqlx SqlitePool with explicit connection limits.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Default maximum connections for the pool.
/// SQLite serialises writers anyway; a handful of readers is plenty.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default on-disk database, next to the working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://campus_booking.db";

/// Create a SQLite connection pool.
///
/// The database file is created if missing and foreign keys are enforced
/// on every connection.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("sqlite://campus_booking.db").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a SQLite connection pool with custom options.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Create a private in-memory database.
///
/// Every SQLite connection to `:memory:` opens a fresh database, so the
/// pool holds exactly one connection and never lets it idle out.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
