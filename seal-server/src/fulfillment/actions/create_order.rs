//! CreateOrder action
//!
//! Inserts the order with its items, issues every item's serial range and
//! reserves the stock. Ends in `waiting_print`.

use async_trait::async_trait;

use super::transition;
use crate::db::repository::{order, stock};
use crate::fulfillment::error::{FulfillmentError, FulfillmentResult, Resource, SerialRangeError};
use crate::fulfillment::serial_range::{self, SerialOwner};
use crate::fulfillment::{WorkflowAction, ledger};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_quantity, validate_required_text};
use shared::models::{Actor, Capability, OrderCreate, OrderDetail, OrderStatus, ProductStatus};
use shared::money;
use shared::util::{now_millis, prefix, reference_number};
use sqlx::SqliteConnection;

#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub data: OrderCreate,
}

impl CreateOrderAction {
    /// Everything that can be checked without the database. Returns the
    /// line totals in item order.
    fn validate(&self) -> FulfillmentResult<Vec<f64>> {
        if self.data.items.is_empty() {
            return Err(FulfillmentError::Validation(
                "order must contain at least one item".into(),
            ));
        }

        let mut totals = Vec::with_capacity(self.data.items.len());
        for (index, item) in self.data.items.iter().enumerate() {
            validate_quantity(item.quantity, &format!("items[{index}].quantity"))?;
            if !money::is_valid_amount(item.unit_price) {
                return Err(FulfillmentError::Validation(format!(
                    "items[{index}].unit_price must be a finite non-negative amount, got {}",
                    item.unit_price
                )));
            }
            let total = match item.total_price {
                Some(total) if !money::is_valid_amount(total) => {
                    return Err(FulfillmentError::Validation(format!(
                        "items[{index}].total_price must be finite and non-negative, got {total}"
                    )));
                }
                Some(total) => total,
                None => money::line_total(item.quantity, item.unit_price),
            };
            totals.push(total);

            validate_required_text(&item.serial_start, "serial_start", MAX_SHORT_TEXT_LEN)?;
            validate_required_text(&item.serial_end, "serial_end", MAX_SHORT_TEXT_LEN)?;
            let range = serial_range::expand(item.serial_start.trim(), item.serial_end.trim())?;
            if range.len() != item.quantity as u64 {
                return Err(SerialRangeError::RangeQuantityMismatch {
                    expected: item.quantity,
                    actual: range.len(),
                }
                .into());
            }
        }
        Ok(totals)
    }
}

#[async_trait]
impl WorkflowAction for CreateOrderAction {
    type Output = OrderDetail;
    const NAME: &'static str = "create_order";
    const CAPABILITY: Capability = Capability::ManageOrders;

    async fn execute(
        &self,
        conn: &mut SqliteConnection,
        actor: &Actor,
    ) -> FulfillmentResult<OrderDetail> {
        // 1. Validate input before any write
        let totals = self.validate()?;

        // 2. Insert the header (also the customer existence check)
        let order_number = reference_number(prefix::ORDER);
        let order_id = order::insert_for_customer(
            &mut *conn,
            order::NewOrder {
                order_number: &order_number,
                customer_id: self.data.customer_id,
                quotation_id: self.data.quotation_id,
                created_by: actor.user_id,
                order_date: self.data.order_date.unwrap_or_else(now_millis),
                total_amount: money::sum(totals.iter().copied()),
            },
        )
        .await?
        .ok_or_else(|| FulfillmentError::not_found(Resource::Customer, self.data.customer_id))?;

        // 3. Items in request order: stock check, line, serials, reservation
        for (item, total_price) in self.data.items.iter().zip(totals) {
            let product = stock::find_with_product(&mut *conn, item.product_id)
                .await?
                .ok_or_else(|| FulfillmentError::not_found(Resource::Product, item.product_id))?;
            if product.product_status != ProductStatus::Active {
                return Err(FulfillmentError::ProductInactive {
                    product_id: item.product_id,
                });
            }
            if product.available < item.quantity {
                return Err(FulfillmentError::InsufficientStock {
                    product_id: item.product_id,
                    product_name: product.product_name,
                    available: product.available,
                    required: item.quantity,
                });
            }

            let serial_start = item.serial_start.trim();
            let serial_end = item.serial_end.trim();
            let item_id = order::insert_item(
                &mut *conn,
                order::NewOrderItem {
                    order_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price,
                    serial_start,
                    serial_end,
                    printing_type: item.printing_type,
                },
            )
            .await?;

            let owner = SerialOwner {
                order_item_id: item_id,
                product_id: item.product_id,
                customer_id: self.data.customer_id,
            };
            serial_range::allocate(conn, owner, serial_start, serial_end, item.quantity).await?;
            ledger::reserve(conn, item.product_id, item.quantity).await?;
        }

        // 4. Ready for printing
        transition(conn, order_id, OrderStatus::Created, OrderStatus::WaitingPrint).await?;

        tracing::info!(
            order_id,
            order_number = %order_number,
            customer_id = self.data.customer_id,
            items = self.data.items.len(),
            "Order created"
        );

        order::find_detail(conn, order_id)
            .await?
            .ok_or_else(|| FulfillmentError::not_found(Resource::Order, order_id))
    }
}
