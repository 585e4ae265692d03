//! Handlers for `/api/products`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use stockroom_core::{DbId, Product, ProductDraft, ProductWithStock};

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::handlers::MessageResponse;
use crate::state::AppState;

/// `GET /api/products` - every product with its category and balance.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<ProductWithStock>>> {
    Ok(Json(state.catalog.list_products().await?))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.catalog.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products/{id}`
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.catalog.get_product(id).await?))
}

/// `PUT /api/products/{id}` - full replacement of the editable fields.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(draft): Json<ProductDraft>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.catalog.update_product(id, draft).await?))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<MessageResponse>> {
    state.catalog.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
