//! RecordPayment action (payment reconciliation)
//!
//! Records one payment against an invoice and reconciles the paid-to-date
//! total. Sums are exact (`Decimal`); "fully paid" allows a 0.01 tolerance.
//! A fully paid invoice completes its order.

use async_trait::async_trait;

use super::transition;
use crate::db::repository::{RepoError, invoice, order, payment};
use crate::fulfillment::WorkflowAction;
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use shared::models::{
    Actor, Capability, InvoiceStatus, OrderStatus, PaymentCreate, PaymentOutcome, PaymentStatus,
};
use shared::money;
use shared::util::{prefix, reference_number};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct RecordPaymentAction {
    pub data: PaymentCreate,
}

#[async_trait]
impl WorkflowAction for RecordPaymentAction {
    type Output = PaymentOutcome;
    const NAME: &'static str = "record_payment";
    const CAPABILITY: Capability = Capability::RecordPayments;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<PaymentOutcome> {
        let amount = self.data.amount;
        if !money::is_valid_amount(amount) || amount <= 0.0 {
            return Err(FulfillmentError::InvalidAmount(amount));
        }
        validate_optional_text(&self.data.reference_no, "reference_no", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&self.data.notes, "notes", MAX_NOTE_LEN)?;

        // 1. Lock and load the invoice
        let invoice_id = self.data.invoice_id;
        if !invoice::touch(&mut *conn, invoice_id).await? {
            return Err(FulfillmentError::not_found(Resource::Invoice, invoice_id));
        }
        let inv = invoice::find_by_id(&mut *conn, invoice_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::Invoice, invoice_id))?;
        if inv.status == InvoiceStatus::Paid {
            return Err(FulfillmentError::InvoicePaid { invoice_id });
        }

        // 2. Record the payment
        let payment_number = reference_number(prefix::PAYMENT);
        let payment_id = payment::insert(
            &mut *conn,
            payment::NewPayment {
                payment_number: &payment_number,
                invoice_id,
                order_id: inv.order_id,
                amount: money::to_f64(money::to_decimal(amount)),
                method: self.data.method,
                reference_no: self.data.reference_no.as_deref(),
                received_by: actor.user_id,
                notes: self.data.notes.as_deref(),
            },
        )
        .await?;

        // 3. Reconcile
        let paid_to_date = money::sum(payment::amounts_for_invoice(&mut *conn, invoice_id).await?);
        let fully_paid = money::is_payment_sufficient(paid_to_date, inv.total_amount);
        let (invoice_status, order_payment_status) = if fully_paid {
            (InvoiceStatus::Paid, PaymentStatus::Paid)
        } else {
            (InvoiceStatus::Pending, PaymentStatus::Partial)
        };

        if fully_paid {
            invoice::set_status(&mut *conn, invoice_id, InvoiceStatus::Paid).await?;
        }
        order::set_payment_status(&mut *conn, inv.order_id, order_payment_status).await?;

        let current = order::find_by_id(&mut *conn, inv.order_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::Order, inv.order_id))?;
        let order_status = if fully_paid && current.status == OrderStatus::Invoiced {
            transition(conn, inv.order_id, OrderStatus::Invoiced, OrderStatus::Completed).await?;
            OrderStatus::Completed
        } else {
            current.status
        };

        tracing::info!(
            payment_id,
            payment_number = %payment_number,
            invoice_id,
            order_id = inv.order_id,
            amount,
            paid_to_date,
            fully_paid,
            "Payment recorded"
        );

        let payment = payment::find_by_id(&mut *conn, payment_id)
            .await?
            .ok_or_else(|| {
                RepoError::Database(format!("Failed to read back payment {payment_id}"))
            })?;
        Ok(PaymentOutcome {
            payment,
            paid_to_date,
            outstanding: money::outstanding(inv.total_amount, paid_to_date),
            invoice_status,
            order_payment_status,
            order_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulfillment::testing::{TestDb, item, seed_customer, seed_product};
    use shared::models::{
        InvoiceCreate, InvoiceType, OrderCreate, PaymentMethod, PrintingJobCreate, Role,
    };

    /// Invoice of 40.00 (16 seals at 2.50) for a printed order
    async fn open_invoice(db: &TestDb) -> (i64, i64) {
        let (customer_id, product_id) = {
            let mut conn = db.conn().await;
            (
                seed_customer(&mut conn, "Harbour Logistics").await,
                seed_product(&mut conn, "Bolt seal", 100).await,
            )
        };
        let admin = Actor::new(1, Role::Admin);
        let service = db.service();
        let detail = service
            .create_order(
                &admin,
                OrderCreate {
                    customer_id,
                    quotation_id: None,
                    order_date: None,
                    items: vec![item(product_id, 16, "R0001", "R0016")],
                },
            )
            .await
            .unwrap();
        let job = service
            .create_printing_job(
                &admin,
                PrintingJobCreate {
                    order_id: detail.order.id,
                    assigned_to: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        service.complete_printing_job(&admin, job.id).await.unwrap();
        let inv = service
            .create_invoice(
                &admin,
                InvoiceCreate {
                    order_id: detail.order.id,
                    invoice_type: InvoiceType::Normal,
                    due_date: None,
                    tax_amount: 0.0,
                },
            )
            .await
            .unwrap();
        (inv.id, detail.order.id)
    }

    fn pay(invoice_id: i64, amount: f64) -> PaymentCreate {
        PaymentCreate {
            invoice_id,
            amount,
            method: PaymentMethod::BankTransfer,
            reference_no: Some("TRX-881".into()),
            notes: None,
        }
    }

    fn cashier() -> Actor {
        Actor::new(12, Role::Cashier)
    }

    #[tokio::test]
    async fn test_partial_then_full_payment_completes_order() {
        let db = TestDb::new().await;
        let (invoice_id, order_id) = open_invoice(&db).await;
        let service = db.service();

        let first = service.record_payment(&cashier(), pay(invoice_id, 15.0)).await.unwrap();
        assert!(first.payment.payment_number.starts_with("PAY"));
        assert_eq!(first.payment.received_by, 12);
        assert_eq!(first.payment.order_id, order_id);
        assert_eq!(first.paid_to_date, 15.0);
        assert_eq!(first.outstanding, 25.0);
        assert_eq!(first.invoice_status, InvoiceStatus::Pending);
        assert_eq!(first.order_payment_status, PaymentStatus::Partial);
        assert_eq!(first.order_status, OrderStatus::Invoiced);

        let second = service.record_payment(&cashier(), pay(invoice_id, 25.0)).await.unwrap();
        assert_eq!(second.paid_to_date, 40.0);
        assert_eq!(second.outstanding, 0.0);
        assert_eq!(second.invoice_status, InvoiceStatus::Paid);
        assert_eq!(second.order_payment_status, PaymentStatus::Paid);
        assert_eq!(second.order_status, OrderStatus::Completed);

        let order = order::find_by_id(&db.pool, order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.completion_date.is_some());
        assert_eq!(payment::find_by_invoice(&db.pool, invoice_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tolerance_and_paid_invoice() {
        let db = TestDb::new().await;
        let (invoice_id, _) = open_invoice(&db).await;
        let service = db.service();

        let outcome = service.record_payment(&cashier(), pay(invoice_id, 39.995)).await.unwrap();
        assert_eq!(outcome.invoice_status, InvoiceStatus::Paid);

        let err = service.record_payment(&cashier(), pay(invoice_id, 1.0)).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::InvoicePaid { .. }));
    }

    #[tokio::test]
    async fn test_invalid_amounts_and_unknown_invoice() {
        let db = TestDb::new().await;
        let (invoice_id, _) = open_invoice(&db).await;
        let service = db.service();

        for amount in [0.0, -5.0, f64::INFINITY, f64::NAN] {
            let err = service
                .record_payment(&cashier(), pay(invoice_id, amount))
                .await
                .unwrap_err();
            assert!(matches!(err, FulfillmentError::InvalidAmount(_)), "{amount}");
        }
        assert!(payment::find_by_invoice(&db.pool, invoice_id).await.unwrap().is_empty());

        let err = service.record_payment(&cashier(), pay(8080, 5.0)).await.unwrap_err();
        assert!(matches!(
            err,
            FulfillmentError::NotFound {
                resource: Resource::Invoice,
                ..
            }
        ));

        let err = service
            .record_payment(&Actor::new(3, Role::StoreKeeper), pay(invoice_id, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, FulfillmentError::Forbidden(_)));
    }
}
