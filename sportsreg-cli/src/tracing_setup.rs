//! Tracing setup for the sportsreg CLI
//!
//! Usage:
//!   sportsreg --debug serve                    # Debug logging to console
//!   RUST_LOG=sportsreg_server=debug sportsreg  # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                                   # Log filter (default: info)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
}

impl TracingConfig {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info,sqlx=warn"
        }
    }
}

/// Initialize console tracing. `RUST_LOG` wins over `--debug`.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
