//! Feedback endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::MessageResponse;
use crate::auth::{authenticate, require_admin, CurrentUser};
use crate::db::repos::{EventFeedback, FeedbackRepo, FeedbackUpsert, MyFeedback};
use crate::http::error::ApiError;
use crate::http::extractors::{lenient_int, JsonBody, ValidId};
use crate::models::{Rating, ValidationError};
use crate::state::AppState;

/// Submit feedback request. Numeric fields accept numbers or numeric strings.
#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub event_id: Option<Value>,
    pub rating: Option<Value>,
    pub comment: Option<String>,
}

/// POST /api/feedback - create or replace the caller's feedback
async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
    JsonBody(req): JsonBody<FeedbackRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let event_id = lenient_int(req.event_id, "event_id")?;
    let rating = lenient_int(req.rating, "rating")?;
    let (Some(event_id), Some(rating)) = (event_id, rating) else {
        return Err(ValidationError::Required {
            message: "Event ID and rating are required",
        }
        .into());
    };
    let rating = Rating::new(rating)?;
    let comment = req
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let outcome = FeedbackRepo::new(&state.pool)
        .upsert(caller.id, event_id, rating, comment)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request("You must participate in the event before submitting feedback")
        })?;

    match outcome {
        FeedbackUpsert::Created { id } => {
            tracing::info!(user_id = caller.id, event_id, feedback_id = id, "feedback submitted");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse::new("Feedback submitted successfully")),
            ))
        }
        FeedbackUpsert::Updated { id } => {
            tracing::info!(user_id = caller.id, event_id, feedback_id = id, "feedback updated");
            Ok((
                StatusCode::OK,
                Json(MessageResponse::new("Feedback updated successfully")),
            ))
        }
    }
}

/// GET /api/feedback/my-feedback
async fn my_feedback(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
) -> Result<Json<Vec<MyFeedback>>, ApiError> {
    let rows = FeedbackRepo::new(&state.pool).list_for_user(caller.id).await?;
    Ok(Json(rows))
}

/// GET /api/feedback/event/{event_id}
async fn event_feedback(
    State(state): State<Arc<AppState>>,
    ValidId(event_id): ValidId,
) -> Result<Json<Vec<EventFeedback>>, ApiError> {
    let rows = FeedbackRepo::new(&state.pool).list_for_event(event_id).await?;
    Ok(Json(rows))
}

/// Feedback routes
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let user = Router::new()
        .route("/api/feedback", post(submit_feedback))
        .route("/api/feedback/my-feedback", get(my_feedback))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let admin = Router::new()
        .route("/api/feedback/event/{event_id}", get(event_feedback))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    user.merge(admin)
}
