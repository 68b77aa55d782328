//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use sportsreg_server::db::{create_pool_with_options, schema};

use super::{AdminArgs, DatabaseArgs};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Only create tables, do not seed the admin account
    #[arg(long)]
    pub no_seed: bool,

    #[command(flatten)]
    pub admin: AdminArgs,
}

/// Apply the schema (idempotent) and optionally seed the admin.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args
        .database
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let pool = create_pool_with_options(&database_url, args.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    schema::run(&pool).await.context("Migration failed")?;
    tracing::info!("Schema up to date");

    if !args.no_seed {
        let admin = args.admin.into_bootstrap();
        let created = schema::seed_admin(&pool, &admin)
            .await
            .context("Failed to seed admin account")?;
        if created {
            println!("Created admin account {}", admin.email);
        } else {
            println!("Admin account {} already exists", admin.email);
        }
    }

    pool.close().await;
    Ok(())
}
