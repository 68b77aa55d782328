//! Admin endpoints - global listings and reports

use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::auth::{authenticate, require_admin};
use crate::db::repos::{
    AdminFeedback, AdminRegistration, FeedbackRepo, RegistrationRepo, Report, ReportRepo, User,
    UserRepo,
};
use crate::http::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/registrations
async fn all_registrations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminRegistration>>, ApiError> {
    Ok(Json(RegistrationRepo::new(&state.pool).list_all().await?))
}

/// GET /api/admin/users
async fn all_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(UserRepo::new(&state.pool).list().await?))
}

/// GET /api/admin/feedback
async fn all_feedback(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminFeedback>>, ApiError> {
    Ok(Json(FeedbackRepo::new(&state.pool).list_all().await?))
}

/// GET /api/admin/reports
async fn reports(State(state): State<Arc<AppState>>) -> Result<Json<Report>, ApiError> {
    Ok(Json(ReportRepo::new(&state.pool).report().await?))
}

/// Admin routes
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/registrations", get(all_registrations))
        .route("/api/admin/users", get(all_users))
        .route("/api/admin/feedback", get(all_feedback))
        .route("/api/admin/reports", get(reports))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}
