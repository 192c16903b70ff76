//! Router assembly
//!
//! Public routes (health, registration, token issuance) and the protected
//! product routes are built as separate routers with their own state and
//! merged here, with the auth middleware layered onto the protected set only.

use crate::auth::{
    api::{generate_token, register_user},
    auth_middleware, AuthState, CredentialStore, TokenService,
};
use crate::middleware::request_logging;
use crate::products::{product_router, ProductState, ProductStore};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Everything the handlers share, wired once at startup
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub products: Arc<dyn ProductStore>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
}

pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::new(state.users, state.tokens.clone(), state.bcrypt_cost);

    let auth_router = Router::new()
        .route("/users", post(register_user))
        .route("/users/generate_token", post(generate_token))
        .with_state(auth_state);

    let protected_routes = product_router()
        .route_layer(middleware::from_fn_with_state(state.tokens, auth_middleware))
        .with_state(ProductState {
            store: state.products,
        });

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(auth_router)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
