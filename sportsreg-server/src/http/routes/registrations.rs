//! Registration endpoints (authenticated)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageResponse;
use crate::auth::{authenticate, CurrentUser};
use crate::db::repos::{EventRepo, MyRegistration, Registration, RegistrationRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{lenient_int, JsonBody, ValidId};
use crate::models::{registration_open, ValidationError};
use crate::state::AppState;

/// Register request. `event_id` may arrive as a number or numeric string.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub event_id: Option<Value>,
}

/// Register response
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub registration: Registration,
}

/// POST /api/registrations
async fn register(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let event_id = lenient_int(req.event_id, "event_id")?
        .filter(|id| *id > 0)
        .ok_or(ValidationError::Required {
            message: "Event ID is required",
        })?;

    let deadline = EventRepo::new(&state.pool)
        .registration_deadline(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Event",
            id: event_id.to_string(),
        })?;

    if !registration_open(deadline, Utc::now()) {
        return Err(ApiError::bad_request("Registration deadline has passed"));
    }

    let registration = RegistrationRepo::new(&state.pool)
        .create(caller.id, event_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Already registered for this event"))?;

    tracing::info!(user_id = caller.id, event_id, "registered for event");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Successfully registered for the event",
            registration,
        }),
    ))
}

/// GET /api/registrations/my-registrations
async fn my_registrations(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
) -> Result<Json<Vec<MyRegistration>>, ApiError> {
    let rows = RegistrationRepo::new(&state.pool)
        .list_for_user(caller.id)
        .await?;
    Ok(Json(rows))
}

/// PUT /api/registrations/{id}/participate
async fn mark_participation(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    RegistrationRepo::new(&state.pool)
        .mark_participated(id, caller.id)
        .await?;
    tracing::info!(user_id = caller.id, registration_id = id, "participation marked");

    Ok(Json(MessageResponse::new("Participation marked successfully")))
}

/// Registration routes
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/registrations", post(register))
        .route("/api/registrations/my-registrations", get(my_registrations))
        .route("/api/registrations/{id}/participate", put(mark_participation))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}
