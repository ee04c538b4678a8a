//! Payment API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::payment;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Payment, PaymentCreate, PaymentOutcome};

/// POST /api/payments - record a payment and reconcile its invoice
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<PaymentOutcome>> {
    let outcome = state.fulfillment.record_payment(&user.actor(), payload).await?;
    Ok(Json(outcome))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Payment>> {
    let payment = payment::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::PaymentNotFound, format!("Payment {id} not found"))
    })?;
    Ok(Json(payment))
}

pub async fn list_by_invoice(
    State(state): State<ServerState>,
    Path(invoice_id): Path<i64>,
) -> AppResult<Json<Vec<Payment>>> {
    let payments = payment::find_by_invoice(&state.pool, invoice_id).await?;
    Ok(Json(payments))
}
