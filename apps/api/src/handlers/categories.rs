//! Handlers for `/api/categories`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use stockroom_core::{Category, CategoryDraft, DbId};

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::handlers::MessageResponse;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.catalog.create_category(draft).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.catalog.get_category(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(draft): Json<CategoryDraft>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.catalog.update_category(id, draft).await?))
}

/// `DELETE /api/categories/{id}`
///
/// Under the `detach` policy the category's products become uncategorized;
/// under `reject` the call answers 409 while any product still uses it.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> ApiResult<Json<MessageResponse>> {
    state.catalog.delete_category(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
