//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::auth::jwt::{TokenError, TokenService};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Identity of the caller, inserted into request extensions by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

/// Auth middleware that validates JWT tokens
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = bearer_token(header).ok_or(AuthError::InvalidFormat)?;

    let id = tokens.verify(token).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        match e {
            TokenError::Expired => AuthError::Expired,
            TokenError::Malformed => AuthError::InvalidToken,
        }
    })?;

    // Add the caller to request extensions so handlers can access it
    req.extensions_mut().insert(AuthenticatedUser { id });

    Ok(next.run(req).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` value
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken,
    Expired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "missing authorization token",
            AuthError::InvalidFormat => "invalid authorization format, use: Bearer {token}",
            AuthError::InvalidToken => "invalid token",
            AuthError::Expired => "token expired",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Extension, Router};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    fn protected_app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthenticatedUser>| async move {
                    user.id.to_string()
                }),
            )
            .route_layer(middleware::from_fn_with_state(tokens, auth_middleware))
    }

    async fn call(app: Router, auth: Option<&str>) -> Response {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_auth_error_responses() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidFormat,
            AuthError::InvalidToken,
            AuthError::Expired,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let tokens = Arc::new(TokenService::new("gate-secret", 300).unwrap());
        let user_id = Uuid::new_v4();
        let issued = tokens.issue(user_id).unwrap();

        let response = call(
            protected_app(tokens),
            Some(&format!("Bearer {}", issued.token)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let tokens = Arc::new(TokenService::new("gate-secret", 300).unwrap());
        let response = call(protected_app(tokens), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_scheme_rejected() {
        let tokens = Arc::new(TokenService::new("gate-secret", 300).unwrap());
        let issued = tokens.issue(Uuid::new_v4()).unwrap();

        let response = call(
            protected_app(tokens),
            Some(&format!("Basic {}", issued.token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let tokens = Arc::new(TokenService::new("gate-secret", 60).unwrap());
        let issued = tokens
            .issue_at(Uuid::new_v4(), Utc::now() - Duration::seconds(300))
            .unwrap();

        let response = call(
            protected_app(tokens),
            Some(&format!("Bearer {}", issued.token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_foreign_token_rejected() {
        let tokens = Arc::new(TokenService::new("gate-secret", 300).unwrap());
        let foreign = TokenService::new("other-secret", 300)
            .unwrap()
            .issue(Uuid::new_v4())
            .unwrap();

        let response = call(
            protected_app(tokens),
            Some(&format!("Bearer {}", foreign.token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
