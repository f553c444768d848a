//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Bearer-token guard on everything except health and auth
//! - Trailing-slash tolerant paths
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::from_extractor_with_state;
use axum::{Router, ServiceExt};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use super::extractors::AuthUser;
use super::routes;
use crate::auth::TokenKeys;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    /// Only use for development or documented use cases.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_permissive: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Signs and verifies bearer tokens
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, tokens: TokenKeys) -> Arc<Self> {
        Arc::new(Self { pool, tokens })
    }
}

/// Build the application router with all routes.
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let protected = Router::new()
        .merge(routes::resources::router())
        .merge(routes::bookings::router())
        .merge(routes::users::router())
        .merge(routes::analytics::router())
        .route_layer(from_extractor_with_state::<AuthUser, _>(state.clone()));

    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router wrapped so `/api/resources/` and `/api/resources` route alike
pub type App = NormalizePath<Router>;

/// Build the servable application: [`build_router`] plus trailing-slash
/// trimming, which must run before routing.
pub fn build_app(state: Arc<AppState>, cors_permissive: bool) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, cors_permissive))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let tokens = TokenKeys::new(secret, DEFAULT_TOKEN_TTL);
/// run_server(pool, tokens, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: SqlitePool,
    tokens: TokenKeys,
    config: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(token_ttl_secs = tokens.ttl().as_secs(), "Token signing configured");
    let state = AppState::new(pool, tokens);

    let app = build_app(state, config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
