//! Axum server setup
//!
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the pool is closed

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::state::AppState;
use crate::Result;

/// Origins allowed when CORS is not permissive
const LOCAL_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_permissive: false,
        }
    }
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(
            LOCAL_ORIGINS
                .iter()
                .copied()
                .map(HeaderValue::from_static)
                .collect::<Vec<_>>(),
        )
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router with all route groups mounted.
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router(state.clone()))
        .merge(routes::events::router(state.clone()))
        .merge(routes::registrations::router(state.clone()))
        .merge(routes::feedback::router(state.clone()))
        .merge(routes::admin::router(state.clone()))
        .layer(cors_layer(cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let state = AppState::new(pool, auth.token_keys());
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<()> {
    let state = Arc::new(state);
    let app = build_router(state.clone(), config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Router tests that stop before any query runs: the pool connects
    //! lazily and is never touched on these paths.

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use crate::auth::TokenKeys;
    use crate::models::Role;

    fn test_state() -> Arc<AppState> {
        let pool = crate::db::pool_options(1)
            .connect_lazy("postgres://localhost/sportsreg_unused")
            .unwrap();
        let tokens = TokenKeys::new(b"router-test-secret", Duration::hours(1));
        Arc::new(AppState::new(pool, tokens))
    }

    fn token(state: &AppState, role: Role) -> String {
        state.tokens.issue(1, role).unwrap()
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(!config.cors_permissive);
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state(), false);
        let (status, body) = send(app, Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let state = test_state();
        for (method, uri) in [
            (Method::GET, "/api/registrations/my-registrations"),
            (Method::POST, "/api/registrations"),
            (Method::PUT, "/api/registrations/1/participate"),
            (Method::POST, "/api/feedback"),
            (Method::GET, "/api/feedback/my-feedback"),
            (Method::GET, "/api/auth/me"),
            (Method::POST, "/api/events"),
            (Method::GET, "/api/admin/reports"),
        ] {
            let app = build_router(state.clone(), false);
            let (status, body) = send(app, method.clone(), uri, None, Some("{}")).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(body["message"], "No token, authorization denied");
        }
    }

    #[tokio::test]
    async fn invalid_and_expired_tokens_rejected() {
        let state = test_state();

        let app = build_router(state.clone(), false);
        let (status, body) = send(
            app,
            Method::GET,
            "/api/registrations/my-registrations",
            Some("garbage"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token is not valid");

        let expired = state
            .tokens
            .issue_at(1, Role::Admin, Utc::now() - Duration::hours(3))
            .unwrap();
        let app = build_router(state.clone(), false);
        let (status, _) = send(app, Method::GET, "/api/admin/users", Some(&expired), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_routes_forbid_regular_users() {
        let state = test_state();
        let user_token = token(&state, Role::User);
        let event_body = r#"{"event_name":"Cup","sport_type":"football","event_date":"2030-01-01","venue":"Park","registration_deadline":"2029-12-01"}"#;

        for (method, uri, body) in [
            (Method::POST, "/api/events", Some(event_body)),
            (Method::PUT, "/api/events/1", Some(event_body)),
            (Method::DELETE, "/api/events/1", None),
            (Method::GET, "/api/admin/reports", None),
            (Method::GET, "/api/admin/users", None),
            (Method::GET, "/api/admin/registrations", None),
            (Method::GET, "/api/admin/feedback", None),
            (Method::GET, "/api/feedback/event/1", None),
        ] {
            let app = build_router(state.clone(), false);
            let (status, json) = send(app, method.clone(), uri, Some(&user_token), body).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
            assert_eq!(json["message"], "Access denied. Admin only.");
        }
    }

    #[tokio::test]
    async fn create_event_validates_before_storage() {
        let state = test_state();
        let admin_token = token(&state, Role::Admin);

        let app = build_router(state.clone(), false);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/events",
            Some(&admin_token),
            Some(r#"{"event_name":"Cup","sport_type":"football"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "All required fields must be provided");

        let app = build_router(state, false);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/events",
            Some(&admin_token),
            Some(r#"{"event_name":"Cup","sport_type":"football","event_date":"soon","venue":"Park","registration_deadline":"2029-12-01"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn feedback_rating_out_of_range_rejected() {
        let state = test_state();
        let user_token = token(&state, Role::User);

        for rating in [0, 6, -3, 42] {
            let app = build_router(state.clone(), false);
            let body = format!(r#"{{"event_id":1,"rating":{}}}"#, rating);
            let (status, json) =
                send(app, Method::POST, "/api/feedback", Some(&user_token), Some(&body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["message"], "Rating must be between 1 and 5");
        }

        let app = build_router(state, false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/feedback",
            Some(&user_token),
            Some(r#"{"event_id":1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Event ID and rating are required");
    }

    #[tokio::test]
    async fn register_requires_event_id() {
        let state = test_state();
        let user_token = token(&state, Role::User);
        let app = build_router(state, false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/registrations",
            Some(&user_token),
            Some("{}"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Event ID is required");
    }

    #[tokio::test]
    async fn signup_validation() {
        let state = test_state();

        let app = build_router(state.clone(), false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(r#"{"name":"Sam","email":"sam@example.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "All fields are required");

        let app = build_router(state.clone(), false);
        let (status, _) = send(
            app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(r#"{"name":"Sam","email":"nope","phone":"555","password":"secret1"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let app = build_router(state, false);
        let (status, _) = send(
            app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(r#"{"name":"Sam","email":"sam@example.com","phone":"555","password":"123"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_and_bad_ids_are_400() {
        let state = test_state();
        let user_token = token(&state, Role::User);

        let app = build_router(state.clone(), false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/registrations",
            Some(&user_token),
            Some("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "bad_request");

        let app = build_router(state.clone(), false);
        let (status, _) = send(app, Method::GET, "/api/events/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let app = build_router(state, false);
        let (status, _) = send(
            app,
            Method::PUT,
            "/api/registrations/-4/participate",
            Some(&user_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_with_blank_fields_is_400() {
        let state = test_state();
        for body in [
            r#"{"email":"","password":""}"#,
            r#"{"email":"  ","password":"secret1"}"#,
            r#"{"email":"sam@example.com","password":""}"#,
        ] {
            let app = build_router(state.clone(), false);
            let (status, json) = send(app, Method::POST, "/api/auth/login", None, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
            assert_eq!(json["message"], "Email and password are required");
        }
    }

    #[tokio::test]
    async fn numeric_strings_are_coerced_before_validation() {
        let state = test_state();
        let user_token = token(&state, Role::User);

        let app = build_router(state.clone(), false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/feedback",
            Some(&user_token),
            Some(r#"{"event_id":"1","rating":"9"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Rating must be between 1 and 5");

        let app = build_router(state.clone(), false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/feedback",
            Some(&user_token),
            Some(r#"{"event_id":1,"rating":4.5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], "rating: must be a whole number");

        let app = build_router(state.clone(), false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/registrations",
            Some(&user_token),
            Some(r#"{"event_id":"0"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Event ID is required");

        let app = build_router(state, false);
        let (status, json) = send(
            app,
            Method::POST,
            "/api/registrations",
            Some(&user_token),
            Some(r#"{"event_id":"nine"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "event_id: must be a whole number");
    }
}
