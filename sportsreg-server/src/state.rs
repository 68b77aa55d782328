//! Application state shared across handlers

use sqlx::PgPool;

use crate::auth::TokenKeys;

/// Shared application state, held behind `Arc` by the router.
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(pool: PgPool, tokens: TokenKeys) -> Self {
        Self { pool, tokens }
    }
}
