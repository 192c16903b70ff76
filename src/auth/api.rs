//! Authentication API Endpoints
//! Mission: Provide user registration and token issuance endpoints

use crate::auth::{
    jwt::TokenService,
    models::{CreateUserRequest, TokenRequest, TokenResponse, User},
    user_store::CredentialStore,
};
use crate::error::{ApiError, StoreError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};
use uuid::Uuid;

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<dyn CredentialStore>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
    decoy: Arc<OnceLock<User>>,
}

impl AuthState {
    pub fn new(
        user_store: Arc<dyn CredentialStore>,
        tokens: Arc<TokenService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_store,
            tokens,
            bcrypt_cost,
            decoy: Arc::new(OnceLock::new()),
        }
    }

    /// Account checked in place of an unknown email, hashed at the configured
    /// cost so both failure paths pay for one bcrypt verification.
    fn decoy_user(&self) -> &User {
        self.decoy.get_or_init(|| {
            let password_hash =
                bcrypt::hash(DECOY_PASSWORD, self.bcrypt_cost).unwrap_or_else(|e| {
                    error!("Failed to hash decoy password: {}", e);
                    String::new()
                });
            User {
                id: Uuid::nil(),
                name: String::new(),
                email: String::new(),
                password_hash,
            }
        })
    }
}

/// Register endpoint - POST /users
pub async fn register_user(
    State(state): State<AuthState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let user = User::register_with_cost(
        &payload.name,
        &payload.email,
        &payload.password,
        state.bcrypt_cost,
    )
    .map_err(|e| {
        if e.is_validation() {
            ApiError::Validation(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    })?;

    state.user_store.create(&user).map_err(|e| {
        warn!("Failed to create user: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    info!("✅ User registered: {}", user.id);

    Ok(StatusCode::CREATED)
}

/// Token endpoint - POST /users/generate_token
///
/// Unknown emails and wrong passwords produce the same response after the same
/// bcrypt work, so callers cannot probe which emails are registered.
pub async fn generate_token(
    State(state): State<AuthState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let user = match state.user_store.find_by_email(&payload.email) {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            let _ = state.decoy_user().verify_password(&payload.password);
            warn!("❌ Failed token request: unknown email");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };

    if !user.verify_password(&payload.password) {
        warn!("❌ Failed token request for user {}", user.id);
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state
        .tokens
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(
        "✅ Token issued for user {} (expires in {}s)",
        user.id, issued.expires_in
    );

    Ok(Json(TokenResponse {
        access_token: issued.token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user_store::SqliteUserStore;

    const TEST_COST: u32 = 4;

    fn test_state() -> AuthState {
        AuthState::new(
            Arc::new(SqliteUserStore::in_memory().unwrap()),
            Arc::new(TokenService::new("auth-api-secret", 300).unwrap()),
            TEST_COST,
        )
    }

    fn token_request(email: &str, password: &str) -> Result<Json<TokenRequest>, JsonRejection> {
        Ok(Json(TokenRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_unknown_email_verifies_against_decoy() {
        let state = test_state();
        assert!(state.decoy.get().is_none());

        let result =
            generate_token(State(state.clone()), token_request("nobody@x.com", "secret")).await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));

        let decoy = state.decoy.get().expect("decoy hashed on the unknown-email path");
        assert!(decoy
            .password_hash
            .starts_with(&format!("$2b${:02}$", TEST_COST)));
        assert!(decoy.verify_password(DECOY_PASSWORD));
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_decoy_untouched() {
        let state = test_state();
        let user = User::register_with_cost("Alice", "a@x.com", "secret", TEST_COST).unwrap();
        state.user_store.create(&user).unwrap();

        let result =
            generate_token(State(state.clone()), token_request("a@x.com", "wrong")).await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
        assert!(state.decoy.get().is_none());

        let issued = generate_token(State(state.clone()), token_request("a@x.com", "secret"))
            .await
            .unwrap();
        assert_eq!(state.tokens.verify(&issued.0.access_token), Ok(user.id));
    }
}
