//! HTTP layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Bearer-token auth and admin gating per route group
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig};
