//! Invoice API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, invoice};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Invoice, InvoiceCreate, OverdueInvoice};
use shared::util::now_millis;

/// POST /api/invoices - invoice a printed order
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<Json<Invoice>> {
    let invoice = state.fulfillment.create_invoice(&user.actor(), payload).await?;
    Ok(Json(invoice))
}

/// GET /api/invoices/overdue - unpaid past their due date, earliest first
pub async fn list_overdue(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<OverdueInvoice>>> {
    let mut conn = state.pool.acquire().await.map_err(RepoError::from)?;
    let overdue = invoice::find_overdue(&mut conn, now_millis()).await?;
    Ok(Json(overdue))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Invoice>> {
    let invoice = invoice::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::InvoiceNotFound, format!("Invoice {id} not found"))
    })?;
    Ok(Json(invoice))
}

/// GET /api/invoices/order/{order_id} - the (single) invoice of an order
pub async fn get_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Invoice>> {
    let invoice = invoice::find_by_order(&state.pool, order_id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvoiceNotFound,
            format!("No invoice for order {order_id}"),
        )
    })?;
    Ok(Json(invoice))
}
