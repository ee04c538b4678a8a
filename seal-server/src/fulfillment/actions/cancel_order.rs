//! CancelOrder action
//!
//! Pre-print: reserved stock goes back to available and the serials are
//! deleted so their codes can be issued again.
//! Post-print: reserved stock is written off as damaged and the serials are
//! flagged damaged but reusable. Only roles allowed to cancel after printing
//! may do this.

use async_trait::async_trait;

use super::lock_order;
use crate::db::repository::{damage, order};
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::fulfillment::{WorkflowAction, ledger, serial_range};
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use shared::models::{Actor, Capability, OrderCancel, OrderStatus, SalesOrder};
use sqlx::SqliteConnection;

/// Damage reason recorded for stock written off by a post-print cancellation
const CANCELLED_AFTER_PRINT: &str = "order cancelled after printing";

#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: i64,
    pub data: OrderCancel,
}

#[async_trait]
impl WorkflowAction for CancelOrderAction {
    type Output = SalesOrder;
    const NAME: &'static str = "cancel_order";
    const CAPABILITY: Capability = Capability::ManageOrders;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<SalesOrder> {
        validate_required_text(&self.data.reason, "reason", MAX_NOTE_LEN)?;

        // 1. Lock and load
        let current = lock_order(conn, self.order_id).await?;
        if !current.status.is_cancellable() {
            return Err(FulfillmentError::InvalidTransition {
                order_id: self.order_id,
                from: current.status,
                to: OrderStatus::Cancelled,
            });
        }

        // 2. Post-print needs the elevated role
        let post_print = self.data.after_printing || current.status.is_past_printing_start();
        if post_print && !actor.role.can_cancel_after_print() {
            tracing::warn!(
                order_id = self.order_id,
                user_id = actor.user_id,
                role = %actor.role,
                "Post-print cancellation refused"
            );
            return Err(FulfillmentError::Forbidden(format!(
                "role {} may not cancel an order after printing",
                actor.role
            )));
        }

        // 3. Reclaim stock and serials per item
        let items = order::find_items(&mut *conn, self.order_id).await?;
        for item in &items {
            if post_print {
                ledger::damage(conn, item.product_id, item.quantity).await?;
                serial_range::mark_damaged(conn, item.id, true).await?;
                damage::insert(
                    &mut *conn,
                    item.product_id,
                    Some(self.order_id),
                    item.quantity,
                    CANCELLED_AFTER_PRINT,
                    actor.user_id,
                    Some(self.data.reason.trim()),
                )
                .await?;
            } else {
                ledger::release(conn, item.product_id, item.quantity).await?;
                serial_range::delete_for_item(conn, item.id).await?;
            }
        }

        // 4. Close the order
        let reason = self.data.reason.trim();
        if !order::mark_cancelled(&mut *conn, self.order_id, current.status, reason, actor.user_id)
            .await?
        {
            return Err(FulfillmentError::InvalidTransition {
                order_id: self.order_id,
                from: current.status,
                to: OrderStatus::Cancelled,
            });
        }

        tracing::info!(
            order_id = self.order_id,
            from = %current.status,
            post_print,
            items = items.len(),
            "Order cancelled"
        );

        order::find_by_id(&mut *conn, self.order_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::Order, self.order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{serial, stock};
    use crate::fulfillment::testing::{TestDb, item, seed_customer, seed_product};
    use shared::models::{OrderCreate, PrintingJobCreate, Role, SerialStatus};

    fn manager() -> Actor {
        Actor::new(7, Role::MarketingManager)
    }

    fn cancel(reason: &str, after_printing: bool) -> OrderCancel {
        OrderCancel {
            reason: reason.to_string(),
            after_printing,
        }
    }

    async fn setup(db: &TestDb, quantity: i64) -> (i64, i64) {
        let (customer_id, product_id) = {
            let mut conn = db.conn().await;
            (
                seed_customer(&mut conn, "Harbour Logistics").await,
                seed_product(&mut conn, "Bolt seal", 50).await,
            )
        };
        let end = format!("S{:04}", quantity);
        let detail = db
            .service()
            .create_order(
                &manager(),
                OrderCreate {
                    customer_id,
                    quotation_id: None,
                    order_date: None,
                    items: vec![item(product_id, quantity, "S0001", &end)],
                },
            )
            .await
            .unwrap();
        (detail.order.id, product_id)
    }

    #[tokio::test]
    async fn test_pre_print_cancel_releases_stock_and_frees_codes() {
        let db = TestDb::new().await;
        let (order_id, product_id) = setup(&db, 10).await;

        let order = db
            .service()
            .cancel_order(&manager(), order_id, cancel("customer withdrew", false))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.cancellation_reason.as_deref(), Some("customer withdrew"));
        assert_eq!(order.cancelled_by, Some(7));
        assert!(order.cancelled_at.is_some());

        let s = stock::find(&db.pool, product_id).await.unwrap().unwrap();
        assert_eq!((s.available, s.reserved, s.damaged), (50, 0, 0));
        assert!(serial::find_by_order(&db.pool, order_id).await.unwrap().is_empty());

        // Codes are free again
        let (again, _) = setup(&db, 10).await;
        assert_eq!(serial::find_by_order(&db.pool, again).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_post_print_cancel_writes_off_as_damaged_reusable() {
        let db = TestDb::new().await;
        let (order_id, product_id) = setup(&db, 4).await;

        let order = db
            .service()
            .cancel_order(&manager(), order_id, cancel("artwork rejected", true))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        let s = stock::find(&db.pool, product_id).await.unwrap().unwrap();
        assert_eq!((s.available, s.reserved, s.damaged), (46, 0, 4));

        let serials = serial::find_by_order(&db.pool, order_id).await.unwrap();
        assert_eq!(serials.len(), 4);
        assert!(
            serials
                .iter()
                .all(|s| s.status == SerialStatus::Damaged && s.is_damaged && s.is_reusable)
        );

        let damages = damage::find_all(&db.pool, 10, 0).await.unwrap();
        assert_eq!(damages.len(), 1);
        assert_eq!(damages[0].order_id, Some(order_id));
        assert_eq!(damages[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_in_progress_order_is_post_print_and_needs_elevated_role() {
        let db = TestDb::new().await;
        let (order_id, product_id) = setup(&db, 3).await;
        let service = db.service();
        service
            .create_printing_job(
                &Actor::new(1, Role::Director),
                PrintingJobCreate {
                    order_id,
                    assigned_to: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        // The action's own gate, independent of the route capability
        let mut conn = db.conn().await;
        let err = CancelOrderAction {
            order_id,
            data: cancel("press broke", false),
        }
        .execute(&mut conn, &Actor::new(9, Role::StoreKeeper))
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::Forbidden(_)));
        drop(conn);

        service
            .cancel_order(&Actor::new(1, Role::Director), order_id, cancel("press broke", false))
            .await
            .unwrap();
        let s = stock::find(&db.pool, product_id).await.unwrap().unwrap();
        assert_eq!((s.reserved, s.damaged), (0, 3));
    }

    #[tokio::test]
    async fn test_cancel_rejections() {
        let db = TestDb::new().await;
        let (order_id, _) = setup(&db, 2).await;
        let service = db.service();

        let err = service
            .cancel_order(&manager(), order_id, cancel("  ", false))
            .await
            .unwrap_err();
        assert!(matches!(err, FulfillmentError::Validation(_)));

        let err = service
            .cancel_order(&manager(), 31337, cancel("typo", false))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FulfillmentError::NotFound {
                resource: Resource::Order,
                ..
            }
        ));

        service
            .cancel_order(&manager(), order_id, cancel("duplicate order", false))
            .await
            .unwrap();
        let err = service
            .cancel_order(&manager(), order_id, cancel("again", false))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FulfillmentError::InvalidTransition {
                from: OrderStatus::Cancelled,
                ..
            }
        ));
    }
}
