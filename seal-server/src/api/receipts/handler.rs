//! Receipt API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::receipt;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Receipt, ReceiptCreate};

/// POST /api/receipts - issue the receipt for a recorded payment
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ReceiptCreate>,
) -> AppResult<Json<Receipt>> {
    let receipt = state.fulfillment.issue_receipt(&user.actor(), payload).await?;
    Ok(Json(receipt))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<Receipt>>> {
    let (limit, offset) = page.bounds();
    let receipts = receipt::find_all(&state.pool, limit, offset).await?;
    Ok(Json(receipts))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Receipt>> {
    let receipt = receipt::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ReceiptNotFound, format!("Receipt {id} not found"))
    })?;
    Ok(Json(receipt))
}

/// GET /api/receipts/payment/{payment_id}
pub async fn get_by_payment(
    State(state): State<ServerState>,
    Path(payment_id): Path<i64>,
) -> AppResult<Json<Receipt>> {
    let receipt = receipt::find_by_payment(&state.pool, payment_id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ReceiptNotFound,
            format!("No receipt for payment {payment_id}"),
        )
    })?;
    Ok(Json(receipt))
}
