//! Receipt Repository

use super::RepoResult;
use shared::models::Receipt;
use sqlx::SqliteExecutor;

const SELECT_RECEIPT: &str =
    "SELECT id, receipt_number, payment_id, amount, issued_by, created_at FROM receipt";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Receipt>> {
    let receipt = sqlx::query_as::<_, Receipt>(&format!("{SELECT_RECEIPT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(receipt)
}

pub async fn find_by_payment(
    db: impl SqliteExecutor<'_>,
    payment_id: i64,
) -> RepoResult<Option<Receipt>> {
    let receipt = sqlx::query_as::<_, Receipt>(&format!("{SELECT_RECEIPT} WHERE payment_id = ?"))
        .bind(payment_id)
        .fetch_optional(db)
        .await?;
    Ok(receipt)
}

pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Receipt>> {
    let receipts = sqlx::query_as::<_, Receipt>(&format!(
        "{SELECT_RECEIPT} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(receipts)
}

/// Insert a receipt carrying the payment's amount, only if the payment
/// exists and has no receipt yet. `None` means nothing was inserted.
pub async fn insert_for_payment(
    db: impl SqliteExecutor<'_>,
    receipt_number: &str,
    payment_id: i64,
    issued_by: i64,
) -> RepoResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO receipt (receipt_number, payment_id, amount, issued_by, created_at) \
         SELECT ?1, p.id, p.amount, ?2, ?3 FROM payment p \
         WHERE p.id = ?4 AND NOT EXISTS (SELECT 1 FROM receipt WHERE payment_id = ?4) \
         RETURNING id",
    )
    .bind(receipt_number)
    .bind(issued_by)
    .bind(shared::util::now_millis())
    .bind(payment_id)
    .fetch_optional(db)
    .await?;
    Ok(id)
}
