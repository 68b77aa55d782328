//! Account endpoints: signup, login, current profile

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::{authenticate, hash_password, verify_password, CurrentUser};
use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::models::validation::required_text;
use crate::models::{Email, NewPassword, Role, ValidationError};
use crate::state::AppState;

const MAX_NAME_LEN: usize = 255;
const MAX_PHONE_LEN: usize = 20;

/// Signup request
#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup/login response
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized {
        message: "Invalid credentials".into(),
    }
}

/// POST /api/auth/signup
async fn signup(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (Some(name), Some(email), Some(phone), Some(password)) =
        (req.name, req.email, req.phone, req.password)
    else {
        return Err(ValidationError::Required {
            message: "All fields are required",
        }
        .into());
    };

    let name = required_text(Some(name), "name", MAX_NAME_LEN)?;
    let email = Email::new(&email)?;
    let phone = required_text(Some(phone), "phone", MAX_PHONE_LEN)?;
    let password = NewPassword::new(&password)?;

    let hash = tokio::task::spawn_blocking(move || hash_password(password.expose())).await??;

    let user = UserRepo::new(&state.pool)
        .create(&name, &email, &phone, &hash, Role::User)
        .await?
        .ok_or_else(|| ApiError::bad_request("User already exists"))?;

    let token = state.tokens.issue(user.id, user.role)?;
    tracing::info!(user_id = user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.filter(|s| !s.trim().is_empty());
    let password = req.password.filter(|s| !s.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ValidationError::Required {
            message: "Email and password are required",
        }
        .into());
    };

    let email = Email::new(&email).map_err(|_| invalid_credentials())?;

    let (user, stored) = UserRepo::new(&state.pool)
        .find_credentials(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await??;
    if !matches {
        tracing::debug!(user_id = user.id, "password mismatch");
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(user.id, user.role)?;
    tracing::info!(user_id = user.id, role = user.role.as_str(), "user logged in");

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user,
    }))
}

/// GET /api/auth/me
async fn me(
    State(state): State<Arc<AppState>>,
    caller: CurrentUser,
) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool).get(caller.id).await?;
    Ok(Json(user))
}

/// Auth routes
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    public.merge(protected)
}
