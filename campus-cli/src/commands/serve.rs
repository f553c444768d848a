//! HTTP server command
//!
//! Opens the database, applies migrations and serves the booking API.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use campus_server::db::{create_pool, migrations, DEFAULT_DATABASE_URL};
use campus_server::http::{run_server, ServerConfig};
use campus_server::{TokenKeys, MAX_TOKEN_TTL};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Lifetime of issued tokens in seconds
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = 3600)]
    pub token_ttl_secs: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let secret = args
        .jwt_secret
        .filter(|s| !s.trim().is_empty())
        .context("JWT_SECRET not set. Set via --jwt-secret, JWT_SECRET env, or .env")?;
    if args.token_ttl_secs == 0 || args.token_ttl_secs > MAX_TOKEN_TTL.as_secs() {
        bail!(
            "--token-ttl-secs must be between 1 and {}",
            MAX_TOKEN_TTL.as_secs()
        );
    }

    let bind_addr = SocketAddr::new(args.host, args.port);
    tracing::info!(database_url = %args.database_url, "Starting campus booking server on {}", bind_addr);

    let pool = create_pool(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", args.database_url))?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    let tokens = TokenKeys::new(secret, Duration::from_secs(args.token_ttl_secs));
    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(pool, tokens, config)
        .await
        .context("Server error")?;

    Ok(())
}
