//! Database layer - connection pool, schema and repositories
//!
//! - One pool, created at startup and passed down (no global handle)
//! - List operations use JOINs, never N+1
//! - Rely on DB constraints and ON CONFLICT, no check-then-insert

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options, pool_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
