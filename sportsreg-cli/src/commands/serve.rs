//! HTTP server command
//!
//! Connects to PostgreSQL, applies the schema, seeds the admin account and
//! runs the API until Ctrl+C/SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use sportsreg_server::config::{AuthConfig, DEFAULT_TOKEN_TTL_HOURS};
use sportsreg_server::db::{create_pool_with_options, schema};
use sportsreg_server::http::{run_server, ServerConfig};
use sportsreg_server::AppState;

use super::{AdminArgs, DatabaseArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Session token lifetime in hours
    #[arg(long, env = "JWT_TTL_HOURS", default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
    pub token_ttl_hours: i64,

    #[command(flatten)]
    pub admin: AdminArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = args
        .database
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    let secret = args
        .jwt_secret
        .filter(|s| !s.is_empty())
        .context("JWT_SECRET not set. Set via --jwt-secret, JWT_SECRET env, or .env")?;
    let auth = AuthConfig::new(secret, args.token_ttl_hours);

    tracing::info!("Starting sportsreg server on {}", args.bind);

    let pool = create_pool_with_options(&database_url, args.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    schema::bootstrap(&pool, &args.admin.into_bootstrap())
        .await
        .context("Failed to prepare database")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(AppState::new(pool, auth.token_keys()), config)
        .await
        .context("Server error")?;

    Ok(())
}
