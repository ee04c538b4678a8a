//! Stock Ledger
//!
//! Moves quantities between the per-product stock buckets. Every movement is
//! a single guarded UPDATE inside the caller's transaction, so the guard is
//! the authoritative availability check even under concurrent writers.
//!
//! | op         | effect                 | guard            |
//! |------------|------------------------|------------------|
//! | reserve    | available → reserved   | available >= q   |
//! | sell       | reserved → sold        | reserved >= q    |
//! | release    | reserved → available   | reserved >= q    |
//! | damage     | reserved → damaged     | reserved >= q    |
//! | write_off  | available → damaged    | available >= q   |
//! | receive    | + available, + received | none            |

use super::error::{FulfillmentError, FulfillmentResult, Resource};
use crate::db::repository::{product, stock};
use sqlx::SqliteConnection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    Reserve,
    Sell,
    Release,
    Damage,
    WriteOff,
    Receive,
}

impl Movement {
    fn name(&self) -> &'static str {
        match self {
            Movement::Reserve => "reserve",
            Movement::Sell => "sell",
            Movement::Release => "release",
            Movement::Damage => "damage",
            Movement::WriteOff => "write_off",
            Movement::Receive => "receive",
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            Movement::Reserve => {
                "UPDATE stock SET available = available - ?1, reserved = reserved + ?1, \
                 updated_at = ?2 WHERE product_id = ?3 AND available >= ?1"
            }
            Movement::Sell => {
                "UPDATE stock SET reserved = reserved - ?1, sold = sold + ?1, updated_at = ?2 \
                 WHERE product_id = ?3 AND reserved >= ?1"
            }
            Movement::Release => {
                "UPDATE stock SET reserved = reserved - ?1, available = available + ?1, \
                 updated_at = ?2 WHERE product_id = ?3 AND reserved >= ?1"
            }
            Movement::Damage => {
                "UPDATE stock SET reserved = reserved - ?1, damaged = damaged + ?1, \
                 updated_at = ?2 WHERE product_id = ?3 AND reserved >= ?1"
            }
            Movement::WriteOff => {
                "UPDATE stock SET available = available - ?1, damaged = damaged + ?1, \
                 updated_at = ?2 WHERE product_id = ?3 AND available >= ?1"
            }
            Movement::Receive => {
                "UPDATE stock SET available = available + ?1, received = received + ?1, \
                 updated_at = ?2 WHERE product_id = ?3"
            }
        }
    }

    /// Whether a failed guard is a normal business outcome (not enough
    /// available stock) rather than corrupted reservation bookkeeping
    fn draws_from_available(&self) -> bool {
        matches!(self, Movement::Reserve | Movement::WriteOff)
    }
}

async fn apply(
    conn: &mut SqliteConnection,
    movement: Movement,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    if quantity <= 0 {
        return Err(FulfillmentError::Validation(format!(
            "{} quantity must be positive, got {quantity}",
            movement.name()
        )));
    }

    let rows = sqlx::query(movement.sql())
        .bind(quantity)
        .bind(shared::util::now_millis())
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() > 0 {
        return Ok(());
    }

    let Some(current) = stock::find(&mut *conn, product_id).await? else {
        return Err(match product::find_by_id(&mut *conn, product_id).await? {
            Some(_) => FulfillmentError::not_found(Resource::Stock, product_id),
            None => FulfillmentError::not_found(Resource::Product, product_id),
        });
    };

    if movement.draws_from_available() {
        let product_name = product::find_by_id(&mut *conn, product_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_default();
        return Err(FulfillmentError::InsufficientStock {
            product_id,
            product_name,
            available: current.available,
            required: quantity,
        });
    }

    tracing::error!(
        product_id,
        movement = movement.name(),
        quantity,
        reserved = current.reserved,
        "Stock ledger invariant violated: reserved would go negative"
    );
    Err(FulfillmentError::LedgerInvariant(format!(
        "{} of {quantity} for product {product_id} exceeds reserved {}",
        movement.name(),
        current.reserved
    )))
}

/// available → reserved
pub async fn reserve(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    apply(conn, Movement::Reserve, product_id, quantity).await
}

/// reserved → sold
pub async fn sell(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    apply(conn, Movement::Sell, product_id, quantity).await
}

/// reserved → available
pub async fn release(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    apply(conn, Movement::Release, product_id, quantity).await
}

/// reserved → damaged
pub async fn damage(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    apply(conn, Movement::Damage, product_id, quantity).await
}

/// available → damaged (damage found in the store, not tied to a reservation)
pub async fn write_off(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    apply(conn, Movement::WriteOff, product_id, quantity).await
}

/// Goods received: the only movement that grows the total
pub async fn receive(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> FulfillmentResult<()> {
    apply(conn, Movement::Receive, product_id, quantity).await
}
