//! Order fulfillment core
//!
//! Every workflow operation is a [`WorkflowAction`] executed by
//! [`FulfillmentService`] inside one SQLite transaction:
//!
//! ```text
//! capability check → BEGIN → action.execute(&mut tx) → COMMIT
//!                              │ (ledger, serial_range, repositories)
//!                              └─ any error → ROLLBACK (tx dropped)
//! ```
//!
//! The whole transaction runs under a deadline; when it expires the
//! transaction is dropped and the caller gets [`FulfillmentError::Timeout`].

pub mod actions;
pub mod error;
pub mod ledger;
pub mod serial_range;

pub use actions::{
    CancelOrderAction, CreateInvoiceAction, CreateOrderAction, CreatePrintingJobAction,
    IssueReceiptAction, RecordDamageAction, RecordPaymentAction, ReceiveStockAction,
    UpdatePrintingJobAction,
};
pub use error::{FulfillmentError, FulfillmentResult, Resource, SerialRangeError};

use async_trait::async_trait;
use shared::models::{
    Actor, Capability, Grn, GrnCreate, Invoice, InvoiceCreate, JobStatus, OrderCancel,
    OrderCreate, OrderDetail, PaymentCreate, PaymentOutcome, PrintingJob, PrintingJobCreate,
    Receipt, ReceiptCreate, SalesOrder, StockDamage, StockDamageCreate,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::time::{Duration, Instant};

/// One workflow operation
#[async_trait]
pub trait WorkflowAction: Send + Sync {
    type Output: Send;

    /// Operation name used in logs
    const NAME: &'static str;

    /// Capability the actor must hold
    const CAPABILITY: Capability;

    /// Run the operation on the caller's transaction. Must not commit.
    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<Self::Output>;
}

/// Runs workflow actions transactionally
#[derive(Clone)]
pub struct FulfillmentService {
    pool: SqlitePool,
    tx_timeout: Duration,
}

impl FulfillmentService {
    pub fn new(pool: SqlitePool, tx_timeout: Duration) -> Self {
        Self { pool, tx_timeout }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check the actor's capability, then run the action in its own
    /// transaction under the configured deadline.
    pub async fn execute<A: WorkflowAction>(
        &self,
        actor: &Actor,
        action: A,
    ) -> FulfillmentResult<A::Output> {
        if !actor.can(A::CAPABILITY) {
            tracing::warn!(
                action = A::NAME,
                user_id = actor.user_id,
                role = %actor.role,
                "Workflow action forbidden for role"
            );
            return Err(FulfillmentError::Forbidden(format!(
                "role {} may not {}",
                actor.role,
                A::NAME.replace('_', " ")
            )));
        }

        let started = Instant::now();
        let result = match tokio::time::timeout(self.tx_timeout, self.run(&action, actor)).await {
            Ok(result) => result,
            Err(_) => Err(FulfillmentError::Timeout(self.tx_timeout.as_millis() as u64)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(
                action = A::NAME,
                user_id = actor.user_id,
                elapsed_ms,
                "Workflow action committed"
            ),
            Err(e) if e.is_business_rejection() => tracing::warn!(
                action = A::NAME,
                user_id = actor.user_id,
                elapsed_ms,
                error = %e,
                "Workflow action rejected"
            ),
            Err(e) => tracing::error!(
                action = A::NAME,
                user_id = actor.user_id,
                elapsed_ms,
                error = %e,
                "Workflow action failed, rolled back"
            ),
        }
        result
    }

    async fn run<A: WorkflowAction>(
        &self,
        action: &A,
        actor: &Actor,
    ) -> FulfillmentResult<A::Output> {
        let mut tx = self.pool.begin().await?;
        let output = action.execute(&mut *tx, actor).await?;
        tx.commit().await?;
        Ok(output)
    }

    // ========== Operations ==========

    pub async fn create_order(
        &self,
        actor: &Actor,
        data: OrderCreate,
    ) -> FulfillmentResult<OrderDetail> {
        self.execute(actor, CreateOrderAction { data }).await
    }

    pub async fn cancel_order(
        &self,
        actor: &Actor,
        order_id: i64,
        data: OrderCancel,
    ) -> FulfillmentResult<SalesOrder> {
        self.execute(actor, CancelOrderAction { order_id, data }).await
    }

    pub async fn create_printing_job(
        &self,
        actor: &Actor,
        data: PrintingJobCreate,
    ) -> FulfillmentResult<PrintingJob> {
        self.execute(actor, CreatePrintingJobAction { data }).await
    }

    pub async fn update_printing_job_status(
        &self,
        actor: &Actor,
        job_id: i64,
        status: JobStatus,
    ) -> FulfillmentResult<PrintingJob> {
        self.execute(actor, UpdatePrintingJobAction { job_id, status }).await
    }

    pub async fn complete_printing_job(
        &self,
        actor: &Actor,
        job_id: i64,
    ) -> FulfillmentResult<PrintingJob> {
        self.update_printing_job_status(actor, job_id, JobStatus::Completed).await
    }

    pub async fn create_invoice(
        &self,
        actor: &Actor,
        data: InvoiceCreate,
    ) -> FulfillmentResult<Invoice> {
        self.execute(actor, CreateInvoiceAction { data }).await
    }

    pub async fn record_payment(
        &self,
        actor: &Actor,
        data: PaymentCreate,
    ) -> FulfillmentResult<PaymentOutcome> {
        self.execute(actor, RecordPaymentAction { data }).await
    }

    pub async fn issue_receipt(
        &self,
        actor: &Actor,
        data: ReceiptCreate,
    ) -> FulfillmentResult<Receipt> {
        self.execute(actor, IssueReceiptAction { data }).await
    }

    pub async fn receive_stock(&self, actor: &Actor, data: GrnCreate) -> FulfillmentResult<Grn> {
        self.execute(actor, ReceiveStockAction { data }).await
    }

    pub async fn record_damage(
        &self,
        actor: &Actor,
        data: StockDamageCreate,
    ) -> FulfillmentResult<StockDamage> {
        self.execute(actor, RecordDamageAction { data }).await
    }
}

/// In-memory database and seed helpers for unit tests
#[cfg(test)]
pub(crate) mod testing {
    use super::FulfillmentService;
    use crate::db::DbService;
    use crate::db::repository::{customer, order, product};
    use shared::models::{OrderItemInput, PrintingType, ProductCreate};
    use shared::util::{prefix, reference_number};
    use sqlx::pool::PoolConnection;
    use sqlx::{Sqlite, SqliteConnection, SqlitePool};
    use std::time::Duration;

    /// Single-connection pool: drop any `conn()` before calling the service.
    pub struct TestDb {
        pub pool: SqlitePool,
    }

    impl TestDb {
        pub async fn new() -> Self {
            let db = DbService::open_in_memory().await.unwrap();
            Self { pool: db.pool }
        }

        pub async fn conn(&self) -> PoolConnection<Sqlite> {
            self.pool.acquire().await.unwrap()
        }

        pub fn service(&self) -> FulfillmentService {
            FulfillmentService::new(self.pool.clone(), Duration::from_secs(10))
        }
    }

    pub async fn seed_customer(conn: &mut SqliteConnection, name: &str) -> i64 {
        customer::create(&mut *conn, name, None).await.unwrap()
    }

    /// Active product with `available` units on hand
    pub async fn seed_product(conn: &mut SqliteConnection, name: &str, available: i64) -> i64 {
        let product = product::create(
            &mut *conn,
            ProductCreate {
                name: name.to_string(),
                description: None,
                unit_price: 10.0,
                minimum_threshold: None,
            },
        )
        .await
        .unwrap();

        sqlx::query("UPDATE stock SET available = ?1, received = ?1 WHERE product_id = ?2")
            .bind(available)
            .bind(product.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        product.id
    }

    /// Bare order with one item and no serials or reservation
    pub async fn seed_order_item(
        conn: &mut SqliteConnection,
        customer_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> i64 {
        let order_number = reference_number(prefix::ORDER);
        let order_id = order::insert_for_customer(
            &mut *conn,
            order::NewOrder {
                order_number: &order_number,
                customer_id,
                quotation_id: None,
                created_by: 1,
                order_date: shared::util::now_millis(),
                total_amount: 0.0,
            },
        )
        .await
        .unwrap()
        .unwrap();

        order::insert_item(
            &mut *conn,
            order::NewOrderItem {
                order_id,
                product_id,
                quantity,
                unit_price: 0.0,
                total_price: 0.0,
                serial_start: "",
                serial_end: "",
                printing_type: PrintingType::NormalSerial,
            },
        )
        .await
        .unwrap()
    }

    /// One order line for `OrderCreate`
    pub fn item(product_id: i64, quantity: i64, start: &str, end: &str) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
            unit_price: 2.5,
            total_price: None,
            serial_start: start.to_string(),
            serial_end: end.to_string(),
            printing_type: PrintingType::NormalSerial,
        }
    }
}
