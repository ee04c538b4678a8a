//! Serial Number Repository (reads)
//!
//! Allocation and status changes live in `fulfillment::serial_range`.

use super::RepoResult;
use shared::models::{SerialDetail, SerialNumber};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor};
use std::collections::HashSet;

pub(crate) const SELECT_SERIAL: &str =
    "SELECT id, order_item_id, product_id, customer_id, code, status, is_damaged, is_reusable, \
     assigned_at, printed_at, sold_at FROM serial_number";

const SELECT_SERIAL_QUALIFIED: &str =
    "SELECT sn.id, sn.order_item_id, sn.product_id, sn.customer_id, sn.code, sn.status, \
     sn.is_damaged, sn.is_reusable, sn.assigned_at, sn.printed_at, sn.sold_at \
     FROM serial_number sn";

/// Codes per `IN (...)` lookup
const LOOKUP_CHUNK: usize = 500;

pub async fn find_by_item(
    db: impl SqliteExecutor<'_>,
    order_item_id: i64,
) -> RepoResult<Vec<SerialNumber>> {
    let serials = sqlx::query_as::<_, SerialNumber>(&format!(
        "{SELECT_SERIAL} WHERE order_item_id = ? ORDER BY id"
    ))
    .bind(order_item_id)
    .fetch_all(db)
    .await?;
    Ok(serials)
}

pub async fn find_by_order(
    db: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<SerialNumber>> {
    let serials = sqlx::query_as::<_, SerialNumber>(&format!(
        "{SELECT_SERIAL_QUALIFIED} JOIN order_item oi ON oi.id = sn.order_item_id \
         WHERE oi.order_id = ? ORDER BY sn.id"
    ))
    .bind(order_id)
    .fetch_all(db)
    .await?;
    Ok(serials)
}

pub async fn find_by_customer(
    db: impl SqliteExecutor<'_>,
    customer_id: i64,
) -> RepoResult<Vec<SerialNumber>> {
    let serials = sqlx::query_as::<_, SerialNumber>(&format!(
        "{SELECT_SERIAL} WHERE customer_id = ? ORDER BY id"
    ))
    .bind(customer_id)
    .fetch_all(db)
    .await?;
    Ok(serials)
}

pub async fn find_damaged(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<SerialNumber>> {
    let serials = sqlx::query_as::<_, SerialNumber>(&format!(
        "{SELECT_SERIAL} WHERE is_damaged = 1 ORDER BY id"
    ))
    .fetch_all(db)
    .await?;
    Ok(serials)
}

pub async fn find_reusable(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<SerialNumber>> {
    let serials = sqlx::query_as::<_, SerialNumber>(&format!(
        "{SELECT_SERIAL} WHERE is_damaged = 1 AND is_reusable = 1 ORDER BY id"
    ))
    .fetch_all(db)
    .await?;
    Ok(serials)
}

/// Look up one code with its customer, product and order
pub async fn search(db: impl SqliteExecutor<'_>, code: &str) -> RepoResult<Option<SerialDetail>> {
    let detail = sqlx::query_as::<_, SerialDetail>(
        "SELECT sn.id, sn.code, sn.status, sn.is_damaged, sn.is_reusable, sn.assigned_at, \
         sn.printed_at, sn.sold_at, \
         p.id AS product_id, p.name AS product_name, c.id AS customer_id, \
         c.company_name AS customer_name, \
         o.id AS order_id, o.order_number \
         FROM serial_number sn \
         JOIN product p ON p.id = sn.product_id \
         JOIN customer c ON c.id = sn.customer_id \
         JOIN order_item oi ON oi.id = sn.order_item_id \
         JOIN sales_order o ON o.id = oi.order_id \
         WHERE sn.code = ?",
    )
    .bind(code.trim())
    .fetch_optional(db)
    .await?;
    Ok(detail)
}

/// Which of `codes` are already issued, in the order of `codes`.
///
/// Advisory only: used to name the collision after an insert failed.
pub async fn find_existing(
    conn: &mut SqliteConnection,
    codes: &[String],
) -> RepoResult<Vec<String>> {
    let mut existing = HashSet::new();
    for chunk in codes.chunks(LOOKUP_CHUNK) {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT code FROM serial_number WHERE code IN (");
        let mut separated = qb.separated(", ");
        for code in chunk {
            separated.push_bind(code);
        }
        separated.push_unseparated(")");

        let found: Vec<String> = qb.build_query_scalar().fetch_all(&mut *conn).await?;
        existing.extend(found);
    }
    Ok(codes
        .iter()
        .filter(|c| existing.contains(*c))
        .cloned()
        .collect())
}
