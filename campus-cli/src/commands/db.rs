//! Database maintenance commands

use anyhow::{Context, Result};
use clap::Parser;

use campus_server::db::{create_pool, migrations, seed, DEFAULT_DATABASE_URL};

/// Arguments shared by the database commands
#[derive(Parser, Debug)]
pub struct DbArgs {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,
}

/// Create tables and indexes
pub async fn run_init_db(args: DbArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", args.database_url))?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    pool.close().await;

    tracing::info!(database_url = %args.database_url, "Schema up to date");
    println!("Database initialised: {}", args.database_url);
    Ok(())
}

/// Migrate, then insert demo users and resources
pub async fn run_seed(args: DbArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", args.database_url))?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    let report = seed::run(&pool).await.context("Failed to seed database")?;
    pool.close().await;

    tracing::info!(
        users = report.users,
        resources = report.resources,
        "Seed complete"
    );
    println!(
        "Seeded {} users and {} resources into {}",
        report.users, report.resources, args.database_url
    );
    Ok(())
}
