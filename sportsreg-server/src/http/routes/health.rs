//! Health check endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Server is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api/health", get(health))
}
