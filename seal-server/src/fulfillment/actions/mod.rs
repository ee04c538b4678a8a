//! Workflow action implementations
//!
//! Each action implements [`WorkflowAction`](super::WorkflowAction) and
//! handles one operation. Actions never begin or commit a transaction; the
//! service does.
//!
//! The first statement of every action is a write (an insert, or a `touch`
//! of the row being changed). That takes SQLite's write lock up front, so
//! everything the action reads afterwards is stable until commit.

mod cancel_order;
mod create_invoice;
mod create_order;
mod create_printing_job;
mod issue_receipt;
mod receive_stock;
mod record_damage;
mod record_payment;
mod update_printing_job;

pub use cancel_order::CancelOrderAction;
pub use create_invoice::CreateInvoiceAction;
pub use create_order::CreateOrderAction;
pub use create_printing_job::CreatePrintingJobAction;
pub use issue_receipt::IssueReceiptAction;
pub use receive_stock::ReceiveStockAction;
pub use record_damage::RecordDamageAction;
pub use record_payment::RecordPaymentAction;
pub use update_printing_job::UpdatePrintingJobAction;

use super::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::db::repository::order;
use shared::models::{OrderStatus, SalesOrder};
use sqlx::SqliteConnection;

/// Take the write lock via the order row and load it
async fn lock_order(conn: &mut SqliteConnection, order_id: i64) -> FulfillmentResult<SalesOrder> {
    if !order::touch(&mut *conn, order_id).await? {
        return Err(FulfillmentError::not_found(Resource::Order, order_id));
    }
    order::find_by_id(&mut *conn, order_id)
        .await?
        .ok_or_else(|| FulfillmentError::not_found(Resource::Order, order_id))
}

/// Guarded status write; `InvalidTransition` when the workflow forbids the
/// move or the row is no longer in `from`
async fn transition(
    conn: &mut SqliteConnection,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> FulfillmentResult<()> {
    if !from.can_transition_to(to) || !order::set_status(&mut *conn, order_id, from, to).await? {
        return Err(FulfillmentError::InvalidTransition { order_id, from, to });
    }
    Ok(())
}
