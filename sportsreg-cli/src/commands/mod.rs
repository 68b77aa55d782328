//! Command implementations for the sportsreg CLI

pub mod migrate;
pub mod serve;

use clap::Args;
use sportsreg_server::config::BootstrapAdmin;
use sportsreg_server::db::DEFAULT_MAX_CONNECTIONS;

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection options shared by every command
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Bootstrap admin account options
#[derive(Args, Debug)]
pub struct AdminArgs {
    /// Display name of the seeded admin
    #[arg(long, env = "ADMIN_NAME")]
    pub admin_name: Option<String>,

    /// Email of the seeded admin
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Phone of the seeded admin
    #[arg(long, env = "ADMIN_PHONE")]
    pub admin_phone: Option<String>,

    /// Password of the seeded admin
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

impl AdminArgs {
    /// Fill unset fields from the built-in defaults.
    pub fn into_bootstrap(self) -> BootstrapAdmin {
        let defaults = BootstrapAdmin::default();
        BootstrapAdmin {
            name: self.admin_name.unwrap_or(defaults.name),
            email: self.admin_email.unwrap_or(defaults.email),
            phone: self.admin_phone.unwrap_or(defaults.phone),
            password: self.admin_password.unwrap_or(defaults.password),
        }
    }
}
