//! Sales Order Repository

use super::RepoResult;
use shared::models::{
    OrderDetail, OrderItem, OrderStatus, PaymentStatus, PrintingType, SalesOrder,
};
use sqlx::{SqliteConnection, SqliteExecutor};

const SELECT_ORDER: &str =
    "SELECT id, order_number, customer_id, quotation_id, created_by, order_date, completion_date, \
     total_amount, status, payment_status, cancellation_reason, cancelled_at, cancelled_by, \
     created_at, updated_at FROM sales_order";

const SELECT_ITEM: &str =
    "SELECT id, order_id, product_id, quantity, unit_price, total_price, serial_start, serial_end, \
     printing_type FROM order_item";

/// Header fields for a new order
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub customer_id: i64,
    pub quotation_id: Option<i64>,
    pub created_by: i64,
    pub order_date: i64,
    pub total_amount: f64,
}

/// Line fields for a new order item
#[derive(Debug, Clone)]
pub struct NewOrderItem<'a> {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub serial_start: &'a str,
    pub serial_end: &'a str,
    pub printing_type: PrintingType,
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<SalesOrder>> {
    let order = sqlx::query_as::<_, SalesOrder>(&format!("{SELECT_ORDER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(order)
}

pub async fn find_items(db: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items =
        sqlx::query_as::<_, OrderItem>(&format!("{SELECT_ITEM} WHERE order_id = ? ORDER BY id"))
        .bind(order_id)
        .fetch_all(db)
        .await?;
    Ok(items)
}

pub async fn find_detail(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };
    let items = find_items(&mut *conn, id).await?;
    Ok(Some(OrderDetail { order, items }))
}

pub async fn find_by_customer(
    db: impl SqliteExecutor<'_>,
    customer_id: i64,
) -> RepoResult<Vec<SalesOrder>> {
    let orders = sqlx::query_as::<_, SalesOrder>(&format!(
        "{SELECT_ORDER} WHERE customer_id = ? ORDER BY order_date DESC"
    ))
    .bind(customer_id)
    .fetch_all(db)
    .await?;
    Ok(orders)
}

/// Newest first, optionally narrowed to one status
pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<SalesOrder>> {
    let orders = sqlx::query_as::<_, SalesOrder>(&format!(
        "{SELECT_ORDER} WHERE ?1 IS NULL OR status = ?1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(status)
    .fetch_all(db)
    .await?;
    Ok(orders)
}

/// Insert the order header with status `created`, only if the customer
/// exists. Returns `None` for an unknown customer.
///
/// Being a write, this is also the statement that takes SQLite's write
/// lock for the surrounding transaction.
pub async fn insert_for_customer(
    db: impl SqliteExecutor<'_>,
    order: NewOrder<'_>,
) -> RepoResult<Option<i64>> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO sales_order (order_number, customer_id, quotation_id, created_by, order_date, \
         total_amount, status, payment_status, created_at, updated_at) \
         SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9 WHERE EXISTS (SELECT 1 FROM customer \
         WHERE id = ?2) \
         RETURNING id",
    )
    .bind(order.order_number)
    .bind(order.customer_id)
    .bind(order.quotation_id)
    .bind(order.created_by)
    .bind(order.order_date)
    .bind(order.total_amount)
    .bind(OrderStatus::Created)
    .bind(PaymentStatus::Pending)
    .bind(now)
    .fetch_optional(db)
    .await?;
    Ok(id)
}

pub async fn insert_item(db: impl SqliteExecutor<'_>, item: NewOrderItem<'_>) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_item (order_id, product_id, quantity, unit_price, total_price, \
         serial_start, serial_end, printing_type) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.total_price)
    .bind(item.serial_start)
    .bind(item.serial_end)
    .bind(item.printing_type)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Bump `updated_at`; the first write of a workflow transaction. Returns
/// false when the order does not exist.
pub async fn touch(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE sales_order SET updated_at = ? WHERE id = ?")
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Compare-and-set on the status column. Returns false when the order was
/// not in `from`.
pub async fn set_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE sales_order SET status = ?1, updated_at = ?2, \
         completion_date = CASE WHEN ?1 = 'completed' THEN ?2 ELSE completion_date END \
         WHERE id = ?3 AND status = ?4",
    )
    .bind(to)
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(from)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn mark_cancelled(
    db: impl SqliteExecutor<'_>,
    id: i64,
    from: OrderStatus,
    reason: &str,
    cancelled_by: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE sales_order SET status = ?1, cancellation_reason = ?2, cancelled_at = ?3, \
         cancelled_by = ?4, updated_at = ?3 \
         WHERE id = ?5 AND status = ?6",
    )
    .bind(OrderStatus::Cancelled)
    .bind(reason)
    .bind(now)
    .bind(cancelled_by)
    .bind(id)
    .bind(from)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn set_payment_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    status: PaymentStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE sales_order SET payment_status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
