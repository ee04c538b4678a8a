//! Payment Repository

use super::RepoResult;
use shared::models::{Payment, PaymentMethod};
use sqlx::SqliteExecutor;

const SELECT_PAYMENT: &str =
    "SELECT id, payment_number, invoice_id, order_id, amount, method, reference_no, received_by, \
     notes, paid_at FROM payment";

#[derive(Debug, Clone)]
pub struct NewPayment<'a> {
    pub payment_number: &'a str,
    pub invoice_id: i64,
    pub order_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference_no: Option<&'a str>,
    pub received_by: i64,
    pub notes: Option<&'a str>,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Payment>> {
    let payment = sqlx::query_as::<_, Payment>(&format!("{SELECT_PAYMENT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(payment)
}

pub async fn find_by_invoice(
    db: impl SqliteExecutor<'_>,
    invoice_id: i64,
) -> RepoResult<Vec<Payment>> {
    let payments = sqlx::query_as::<_, Payment>(&format!(
        "{SELECT_PAYMENT} WHERE invoice_id = ? ORDER BY paid_at, id"
    ))
    .bind(invoice_id)
    .fetch_all(db)
    .await?;
    Ok(payments)
}

/// Amounts recorded against one invoice (summed by the caller with Decimal)
pub async fn amounts_for_invoice(
    db: impl SqliteExecutor<'_>,
    invoice_id: i64,
) -> RepoResult<Vec<f64>> {
    let amounts = sqlx::query_scalar::<_, f64>("SELECT amount FROM payment WHERE invoice_id = ?")
        .bind(invoice_id)
        .fetch_all(db)
        .await?;
    Ok(amounts)
}

pub async fn insert(db: impl SqliteExecutor<'_>, payment: NewPayment<'_>) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO payment (payment_number, invoice_id, order_id, amount, method, reference_no, \
         received_by, notes, paid_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(payment.payment_number)
    .bind(payment.invoice_id)
    .bind(payment.order_id)
    .bind(payment.amount)
    .bind(payment.method)
    .bind(payment.reference_no)
    .bind(payment.received_by)
    .bind(payment.notes)
    .bind(shared::util::now_millis())
    .fetch_one(db)
    .await?;
    Ok(id)
}
