//! Request authentication middleware and the caller identity extractor
//!
//! `authenticate` verifies the bearer token and stores a [`CurrentUser`] in
//! request extensions. `require_admin` must be layered inside it and rejects
//! non-admin callers. Handlers take `CurrentUser` as an extractor.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::error::ApiError;
use crate::models::Role;
use crate::state::AppState;

/// Identity of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject requests without a valid, unexpired token (401).
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| ApiError::Unauthorized {
        message: "No token, authorization denied".into(),
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        ApiError::Unauthorized {
            message: "Token is not valid".into(),
        }
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Reject callers whose role is not admin (403).
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized {
            message: "No token, authorization denied".into(),
        })?;

    if !user.is_admin() {
        tracing::debug!(user_id = user.id, "non-admin caller rejected");
        return Err(ApiError::Forbidden {
            reason: "Access denied. Admin only.".into(),
        });
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized {
                message: "No token, authorization denied".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn parses_bearer() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
