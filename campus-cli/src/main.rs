//! campus CLI - run and maintain the campus resource booking backend
//!
//! - `serve`: HTTP API (signup/login, resources, bookings, analytics)
//! - `init-db`: create the SQLite schema
//! - `seed`: load demo users and resources

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "campus",
    author,
    version,
    about = "Campus resource booking backend",
    long_about = "Book rooms, halls and equipment without double-booking. Serves a JSON API \
                  over SQLite with bearer-token authentication."
)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create database tables and indexes
    InitDb(commands::db::DbArgs),
    /// Insert demo users and resources (idempotent)
    Seed(commands::db::DbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap's env fallbacks see .env values
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::InitDb(args) => commands::run_init_db(args).await,
        Commands::Seed(args) => commands::run_seed(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
