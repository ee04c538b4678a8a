//! Serial Number API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::serial;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{SerialDetail, SerialNumber};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub code: String,
}

/// GET /api/serials/search?code=... - exact code lookup with order/customer context
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SerialDetail>> {
    let code = query.code.trim();
    if code.is_empty() {
        return Err(AppError::validation("code is required"));
    }
    let detail = serial::search(&state.pool, code).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::SerialNotFound, format!("Serial {code} not found"))
    })?;
    Ok(Json(detail))
}

pub async fn list_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Vec<SerialNumber>>> {
    let serials = serial::find_by_order(&state.pool, order_id).await?;
    Ok(Json(serials))
}

pub async fn list_by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<i64>,
) -> AppResult<Json<Vec<SerialNumber>>> {
    let serials = serial::find_by_customer(&state.pool, customer_id).await?;
    Ok(Json(serials))
}

/// GET /api/serials/damaged - codes destroyed by post-print cancellation
pub async fn list_damaged(State(state): State<ServerState>) -> AppResult<Json<Vec<SerialNumber>>> {
    let serials = serial::find_damaged(&state.pool).await?;
    Ok(Json(serials))
}

pub async fn list_reusable(State(state): State<ServerState>) -> AppResult<Json<Vec<SerialNumber>>> {
    let serials = serial::find_reusable(&state.pool).await?;
    Ok(Json(serials))
}
