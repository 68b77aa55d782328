//! Event endpoints - public reads, admin writes

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::auth::{authenticate, require_admin, CurrentUser};
use crate::db::repos::{Event, EventRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidId};
use crate::models::{EventPatch, NewEvent};
use crate::state::AppState;

/// Create/update event request. Timestamps arrive as strings and are
/// parsed by the model layer.
#[derive(Deserialize, Default)]
pub struct EventRequest {
    pub event_name: Option<String>,
    pub sport_type: Option<String>,
    pub event_date: Option<String>,
    pub venue: Option<String>,
    pub registration_deadline: Option<String>,
    pub description: Option<String>,
}

/// Write response carrying the stored event
#[derive(Serialize)]
pub struct EventWriteResponse {
    pub message: &'static str,
    pub event: Event,
}

/// GET /api/events
async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepo::new(&state.pool).list().await?;
    Ok(Json(events))
}

/// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepo::new(&state.pool).get(id).await?;
    Ok(Json(event))
}

/// POST /api/events
async fn create_event(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    JsonBody(req): JsonBody<EventRequest>,
) -> Result<(StatusCode, Json<EventWriteResponse>), ApiError> {
    let new_event = NewEvent::new(
        req.event_name,
        req.sport_type,
        req.event_date,
        req.venue,
        req.registration_deadline,
        req.description,
    )?;

    let event = EventRepo::new(&state.pool).create(&new_event, caller.id).await?;
    tracing::info!(event_id = event.id, admin_id = caller.id, "event created");

    Ok((
        StatusCode::CREATED,
        Json(EventWriteResponse {
            message: "Event created successfully",
            event,
        }),
    ))
}

/// PUT /api/events/{id}
async fn update_event(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    JsonBody(req): JsonBody<EventRequest>,
) -> Result<Json<EventWriteResponse>, ApiError> {
    let patch = EventPatch::new(
        req.event_name,
        req.sport_type,
        req.event_date,
        req.venue,
        req.registration_deadline,
        req.description,
    )?;

    let event = EventRepo::new(&state.pool).update(id, &patch).await?;
    tracing::info!(event_id = id, "event updated");

    Ok(Json(EventWriteResponse {
        message: "Event updated successfully",
        event,
    }))
}

/// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    EventRepo::new(&state.pool).delete(id).await?;
    tracing::info!(event_id = id, "event deleted");

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Event routes
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/{id}", get(get_event));

    let admin = Router::new()
        .route("/api/events", post(create_event))
        .route("/api/events/{id}", put(update_event).delete(delete_event))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    public.merge(admin)
}
