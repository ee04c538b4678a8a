//! CreateInvoice action
//!
//! Invoices a `job_done` order once. The reserved stock is sold and the
//! serials are marked sold in the same transaction.

use async_trait::async_trait;

use super::{lock_order, transition};
use crate::db::repository::{invoice, order};
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::fulfillment::{WorkflowAction, ledger, serial_range};
use shared::models::{Actor, Capability, Invoice, InvoiceCreate, OrderStatus};
use shared::money::{self, to_decimal, to_f64};
use shared::util::{prefix, reference_number};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct CreateInvoiceAction {
    pub data: InvoiceCreate,
}

#[async_trait]
impl WorkflowAction for CreateInvoiceAction {
    type Output = Invoice;
    const NAME: &'static str = "create_invoice";
    const CAPABILITY: Capability = Capability::ManageInvoices;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<Invoice> {
        let tax_amount = self.data.tax_amount;
        if !money::is_valid_amount(tax_amount) {
            return Err(FulfillmentError::Validation(format!(
                "tax_amount must be a finite non-negative amount, got {tax_amount}"
            )));
        }

        // 1. Lock and check the order
        let order_id = self.data.order_id;
        let current = lock_order(conn, order_id).await?;
        if invoice::find_by_order(&mut *conn, order_id).await?.is_some() {
            return Err(FulfillmentError::AlreadyInvoiced { order_id });
        }
        if current.status != OrderStatus::JobDone {
            return Err(FulfillmentError::InvalidTransition {
                order_id,
                from: current.status,
                to: OrderStatus::Invoiced,
            });
        }

        // 2. Amounts
        let subtotal = to_decimal(current.total_amount);
        let total = subtotal + to_decimal(tax_amount);

        // 3. Invoice + order status
        let invoice_number = reference_number(prefix::INVOICE);
        let invoice_id = invoice::insert(
            &mut *conn,
            invoice::NewInvoice {
                invoice_number: &invoice_number,
                order_id,
                customer_id: current.customer_id,
                invoice_type: self.data.invoice_type,
                due_date: self.data.due_date,
                subtotal: to_f64(subtotal),
                tax_amount: to_f64(to_decimal(tax_amount)),
                total_amount: to_f64(total),
                created_by: actor.user_id,
            },
        )
        .await?;
        transition(conn, order_id, OrderStatus::JobDone, OrderStatus::Invoiced).await?;

        // 4. Reserved → sold
        for item in order::find_items(&mut *conn, order_id).await? {
            ledger::sell(conn, item.product_id, item.quantity).await?;
            serial_range::mark_sold(conn, item.id).await?;
        }

        tracing::info!(
            invoice_id,
            invoice_number = %invoice_number,
            order_id,
            total = %total,
            "Invoice created"
        );

        invoice::find_by_id(&mut *conn, invoice_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::Invoice, invoice_id))
    }
}
