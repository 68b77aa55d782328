//! sportsreg CLI - runs the sports event registration backend
//!
//! - `serve`: apply the schema, seed the admin account and run the HTTP API
//! - `migrate`: apply the schema (and seed) without starting the server
//!
//! Settings come from flags, environment variables or a `.env` file in the
//! working directory.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::migrate::MigrateArgs;
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sportsreg",
    author,
    version,
    about = "Sports event registration backend",
    long_about = "Event catalogue, registrations with participation tracking, post-event \
                  feedback and admin reports, served as a JSON API backed by PostgreSQL."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Create or update the database schema
    Migrate(MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
