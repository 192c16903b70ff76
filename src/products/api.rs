//! Product API Endpoints
//!
//! CRUD over products. Every route here sits behind the auth middleware, so
//! handlers can rely on an `AuthenticatedUser` extension being present.
//!
//! # Endpoints
//!
//! - `POST /products` - Create a product
//! - `GET /products` - List products (`?page=&limit=&sort=asc|desc`)
//! - `GET /products/:id` - Get one product
//! - `PUT /products/:id` - Replace name and price
//! - `DELETE /products/:id` - Delete a product

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::products::{
    entity::Product,
    store::{ListQuery, ProductStore, SortOrder},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Shared product state
#[derive(Clone)]
pub struct ProductState {
    pub store: Arc<dyn ProductStore>,
}

/// Create/update request body
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

/// Query parameters for listing products.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub limit: Option<u32>,
    /// `asc` (default) or `desc` by creation time.
    pub sort: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        Self {
            page: p.page.unwrap_or(0),
            limit: p.limit.unwrap_or(0),
            sort: p.sort.as_deref().map(SortOrder::parse).unwrap_or_default(),
        }
    }
}

pub fn product_router() -> Router<ProductState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("invalid id".to_string()))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// POST /products
pub async fn create_product(
    State(state): State<ProductState>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let body = json_body(payload)?;

    let product = Product::create(&body.name, body.price)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    state.store.create(&product)?;

    info!("Product {} created by user {}", product.id, caller.id);

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products
pub async fn list_products(
    State(state): State<ProductState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let products = state.store.list(&params.into())?;

    Ok(Json(products))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;

    let product = state.store.find_by_id(&id)?;

    Ok(Json(product))
}

/// PUT /products/:id
pub async fn update_product(
    State(state): State<ProductState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let body = json_body(payload)?;

    let mut product = state.store.find_by_id(&id)?;
    product
        .update(&body.name, body.price)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    state.store.update(&product)?;

    info!("Product {} updated by user {}", product.id, caller.id);

    Ok(Json(product))
}

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<ProductState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    state.store.delete(&id)?;

    info!("Product {} deleted by user {}", id, caller.id);

    Ok(StatusCode::OK)
}
