//! Serial Range Engine
//!
//! Turns a `(start, end)` pair such as `AB000100`..`AB000199` into the
//! individual seal codes and manages the issued `serial_number` rows.
//!
//! The UNIQUE constraint on `serial_number.code` is the only collision
//! check. Allocation runs inside a savepoint, so a collision leaves no rows
//! from the failed call behind while the caller's transaction stays usable.

use super::error::{FulfillmentError, FulfillmentResult, SerialRangeError};
use crate::db::repository::serial;
use shared::models::{SerialNumber, SerialStatus};
use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection};

/// Rows per multi-row INSERT
const INSERT_CHUNK: usize = 100;

/// Parsed, validated serial range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialRange {
    pub prefix: String,
    /// Digit count of the start code; every generated code is padded to it
    pub width: usize,
    pub start: u64,
    pub end: u64,
    /// `end - start + 1`, checked when the range is parsed
    count: u64,
}

impl SerialRange {
    /// Number of codes in the range (inclusive)
    pub fn len(&self) -> u64 {
        self.count
    }

    /// A validated range holds at least one code
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn code(&self, number: u64) -> String {
        format!("{}{:0width$}", self.prefix, number, width = self.width)
    }

    /// Codes in ascending order
    pub fn codes(&self) -> impl Iterator<Item = String> + '_ {
        (self.start..=self.end).map(|n| self.code(n))
    }
}

/// Split `AB000123` into `("AB", "000123")`
fn split_code(code: &str) -> Result<(&str, &str), SerialRangeError> {
    let digits_at = code
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(code.len());
    let (prefix, digits) = code.split_at(digits_at);

    if prefix.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SerialRangeError::InvalidFormat(format!(
            "{code:?} must be uppercase letters followed by digits"
        )));
    }
    Ok((prefix, digits))
}

fn parse_number(code: &str, digits: &str) -> Result<u64, SerialRangeError> {
    digits
        .parse::<u64>()
        .map_err(|_| SerialRangeError::InvalidFormat(format!("{code:?} number is out of range")))
}

/// Parse and validate a serial range
pub fn expand(start: &str, end: &str) -> Result<SerialRange, SerialRangeError> {
    let (start_prefix, start_digits) = split_code(start)?;
    let (end_prefix, end_digits) = split_code(end)?;

    if start_prefix != end_prefix {
        return Err(SerialRangeError::InvalidFormat(format!(
            "prefix mismatch: {start_prefix:?} vs {end_prefix:?}"
        )));
    }

    let start_number = parse_number(start, start_digits)?;
    let end_number = parse_number(end, end_digits)?;
    let count = end_number
        .checked_sub(start_number)
        .ok_or_else(|| {
            SerialRangeError::InvalidFormat(format!("range end {end:?} is before start {start:?}"))
        })?
        .checked_add(1)
        .ok_or_else(|| {
            SerialRangeError::InvalidFormat(format!("range {start:?}..{end:?} is too large"))
        })?;

    Ok(SerialRange {
        prefix: start_prefix.to_string(),
        width: start_digits.len(),
        start: start_number,
        end: end_number,
        count,
    })
}

/// Ownership stamped on every allocated serial
#[derive(Debug, Clone, Copy)]
pub struct SerialOwner {
    pub order_item_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
}

/// Issue one `assigned` serial per code in `start..=end`.
///
/// Returns the rows in range order. Fails with `RangeQuantityMismatch`
/// before touching the database when the range length differs from
/// `expected_quantity`, and with `DuplicateSerial` naming the first
/// already-issued code when any code collides.
pub async fn allocate(
    conn: &mut SqliteConnection,
    owner: SerialOwner,
    start: &str,
    end: &str,
    expected_quantity: i64,
) -> FulfillmentResult<Vec<SerialNumber>> {
    let range = expand(start, end)?;
    if expected_quantity <= 0 || range.len() != expected_quantity as u64 {
        return Err(SerialRangeError::RangeQuantityMismatch {
            expected: expected_quantity,
            actual: range.len(),
        }
        .into());
    }

    let codes: Vec<String> = range.codes().collect();
    let now = shared::util::now_millis();

    let mut savepoint = conn.begin().await?;
    for chunk in codes.chunks(INSERT_CHUNK) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO serial_number (order_item_id, product_id, customer_id, code, status, \
             is_damaged, is_reusable, assigned_at) ",
        );
        qb.push_values(chunk, |mut row, code| {
            row.push_bind(owner.order_item_id)
                .push_bind(owner.product_id)
                .push_bind(owner.customer_id)
                .push_bind(code)
                .push_bind(SerialStatus::Assigned)
                .push_bind(false)
                .push_bind(false)
                .push_bind(now);
        });

        match qb.build().execute(&mut *savepoint).await {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                savepoint.rollback().await?;
                let existing = serial::find_existing(&mut *conn, &codes).await?;
                let code = existing
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| chunk[0].clone());
                tracing::warn!(
                    order_item_id = owner.order_item_id,
                    serial_code = %code,
                    "Serial allocation rejected: code already issued"
                );
                return Err(FulfillmentError::DuplicateSerial { code });
            }
            Err(e) => return Err(e.into()),
        }
    }
    savepoint.commit().await?;

    let rows = serial::find_by_item(&mut *conn, owner.order_item_id).await?;
    tracing::debug!(
        order_item_id = owner.order_item_id,
        count = rows.len(),
        first = %range.code(range.start),
        "Serials allocated"
    );
    Ok(rows)
}

/// Stamp the item's serials as printed. Re-printing re-stamps `printed_at`.
pub async fn mark_printed(
    conn: &mut SqliteConnection,
    order_item_id: i64,
) -> FulfillmentResult<Vec<SerialNumber>> {
    sqlx::query(
        "UPDATE serial_number SET status = ?, printed_at = ? WHERE order_item_id = ? \
         AND status IN ('assigned', 'printed')",
    )
    .bind(SerialStatus::Printed)
    .bind(shared::util::now_millis())
    .bind(order_item_id)
    .execute(&mut *conn)
    .await?;

    Ok(serial::find_by_item(&mut *conn, order_item_id).await?)
}

pub async fn mark_sold(conn: &mut SqliteConnection, order_item_id: i64) -> FulfillmentResult<u64> {
    let rows = sqlx::query(
        "UPDATE serial_number SET status = ?, sold_at = ? WHERE order_item_id = ? \
         AND status IN ('assigned', 'printed')",
    )
    .bind(SerialStatus::Sold)
    .bind(shared::util::now_millis())
    .bind(order_item_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn mark_damaged(
    conn: &mut SqliteConnection,
    order_item_id: i64,
    is_reusable: bool,
) -> FulfillmentResult<u64> {
    let rows = sqlx::query(
        "UPDATE serial_number SET status = ?, is_damaged = 1, is_reusable = ? \
         WHERE order_item_id = ?",
    )
    .bind(SerialStatus::Damaged)
    .bind(is_reusable)
    .bind(order_item_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

/// Pre-print cancellation only: the codes become available again
pub async fn delete_for_item(
    conn: &mut SqliteConnection,
    order_item_id: i64,
) -> FulfillmentResult<u64> {
    let rows = sqlx::query("DELETE FROM serial_number WHERE order_item_id = ?")
        .bind(order_item_id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}
