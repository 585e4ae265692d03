//! Handlers for `/api/stock`: movements, balances and ledger audits.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use stockroom_core::{
    DbId, LedgerAudit, MovementEntry, MovementFilter, StockBalance, StockReceipt,
    StockSummaryEntry,
};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/stock/import` and `POST /api/stock/export`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: DbId,
    pub quantity: i64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub receipt: StockReceipt,
}

/// One line of `GET /api/stock/current`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStock {
    pub product_id: DbId,
    pub sku: String,
    pub quantity: i64,
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// `POST /api/stock/import`
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<MovementRequest>,
) -> ApiResult<Json<ReceiptResponse>> {
    let receipt = state
        .engine
        .import_stock(req.product_id, user.user_id, req.quantity, &req.notes)
        .await
        .map_err(ApiError::Stock)?;

    info!(
        product_id = req.product_id,
        user_id = user.user_id,
        quantity = req.quantity,
        balance = receipt.balance,
        "Stock imported"
    );
    Ok(Json(ReceiptResponse {
        message: "Stock imported successfully",
        receipt,
    }))
}

/// `POST /api/stock/export`
pub async fn export(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<MovementRequest>,
) -> ApiResult<Json<ReceiptResponse>> {
    let receipt = state
        .engine
        .export_stock(req.product_id, user.user_id, req.quantity, &req.notes)
        .await
        .map_err(ApiError::Stock)?;

    info!(
        product_id = req.product_id,
        user_id = user.user_id,
        quantity = req.quantity,
        balance = receipt.balance,
        "Stock exported"
    );
    Ok(Json(ReceiptResponse {
        message: "Stock exported successfully",
        receipt,
    }))
}

/// `GET /api/stock/movements?startDate=..&endDate=..&productId=..&categoryId=..`
pub async fn list_movements(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<MovementFilter>,
) -> ApiResult<Json<Vec<MovementEntry>>> {
    search(&state, &filter).await
}

/// `POST /api/stock/movements` with the filter as the body.
pub async fn search_movements(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(filter): Json<MovementFilter>,
) -> ApiResult<Json<Vec<MovementEntry>>> {
    search(&state, &filter).await
}

async fn search(state: &AppState, filter: &MovementFilter) -> ApiResult<Json<Vec<MovementEntry>>> {
    let entries = state
        .engine
        .query_movements(filter)
        .await
        .map_err(ApiError::Stock)?;
    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

/// `GET /api/stock/summary`
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<StockSummaryEntry>>> {
    Ok(Json(state.engine.stock_summary().await?))
}

/// `GET /api/stock/current`
pub async fn current(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<CurrentStock>>> {
    let current = state
        .engine
        .stock_summary()
        .await?
        .into_iter()
        .map(|entry| CurrentStock {
            product_id: entry.product_id,
            sku: entry.sku,
            quantity: entry.quantity,
        })
        .collect();
    Ok(Json(current))
}

/// `GET /api/stock/{product_id}`
pub async fn balance(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(product_id): Path<DbId>,
) -> ApiResult<Json<StockBalance>> {
    Ok(Json(state.engine.get_balance(product_id).await?))
}

/// `GET /api/stock/{product_id}/audit`
pub async fn audit(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(product_id): Path<DbId>,
) -> ApiResult<Json<LedgerAudit>> {
    Ok(Json(state.engine.verify_ledger(product_id).await?))
}
