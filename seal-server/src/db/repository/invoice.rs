//! Invoice Repository

use super::{RepoResult, payment};
use shared::models::{Invoice, InvoiceStatus, InvoiceType, OverdueInvoice};
use shared::money;
use sqlx::{SqliteConnection, SqliteExecutor};

const SELECT_INVOICE: &str =
    "SELECT id, invoice_number, order_id, customer_id, invoice_type, due_date, subtotal, \
     tax_amount, total_amount, status, created_by, created_at, updated_at FROM invoice";

#[derive(Debug, Clone)]
pub struct NewInvoice<'a> {
    pub invoice_number: &'a str,
    pub order_id: i64,
    pub customer_id: i64,
    pub invoice_type: InvoiceType,
    pub due_date: Option<i64>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub created_by: i64,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Invoice>> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!("{SELECT_INVOICE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(invoice)
}

pub async fn find_by_order(
    db: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Option<Invoice>> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!("{SELECT_INVOICE} WHERE order_id = ?"))
        .bind(order_id)
        .fetch_optional(db)
        .await?;
    Ok(invoice)
}

/// Unpaid invoices due before `now`, earliest due first. Paid-to-date is
/// summed the same way payment reconciliation does.
pub async fn find_overdue(
    conn: &mut SqliteConnection,
    now: i64,
) -> RepoResult<Vec<OverdueInvoice>> {
    let mut rows = sqlx::query_as::<_, OverdueInvoice>(
        "SELECT id AS invoice_id, invoice_number, order_id, customer_id, due_date, total_amount \
         FROM invoice WHERE status <> ? AND due_date IS NOT NULL AND due_date < ? \
         ORDER BY due_date ASC, id ASC",
    )
    .bind(InvoiceStatus::Paid)
    .bind(now)
    .fetch_all(&mut *conn)
    .await?;

    for row in &mut rows {
        let amounts = payment::amounts_for_invoice(&mut *conn, row.invoice_id).await?;
        row.paid_amount = money::sum(amounts);
        row.outstanding = money::outstanding(row.total_amount, row.paid_amount);
    }
    Ok(rows)
}

pub async fn insert(db: impl SqliteExecutor<'_>, invoice: NewInvoice<'_>) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO invoice (invoice_number, order_id, customer_id, invoice_type, due_date, \
         subtotal, tax_amount, total_amount, status, created_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11) RETURNING id",
    )
    .bind(invoice.invoice_number)
    .bind(invoice.order_id)
    .bind(invoice.customer_id)
    .bind(invoice.invoice_type)
    .bind(invoice.due_date)
    .bind(invoice.subtotal)
    .bind(invoice.tax_amount)
    .bind(invoice.total_amount)
    .bind(InvoiceStatus::Pending)
    .bind(invoice.created_by)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// First write of the payment transaction; false when the invoice is unknown
pub async fn touch(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE invoice SET updated_at = ? WHERE id = ?")
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn set_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    status: InvoiceStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE invoice SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
