//! Serial Number Model

use serde::{Deserialize, Serialize};

/// Lifecycle of a single seal code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum SerialStatus {
    Assigned,
    Printed,
    Sold,
    Damaged,
}

/// Issued serial number (globally unique `code`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SerialNumber {
    pub id: i64,
    pub order_item_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub code: String,
    pub status: SerialStatus,
    pub is_damaged: bool,
    /// Damaged after printing but the physical seal can be reissued
    pub is_reusable: bool,
    pub assigned_at: i64,
    pub printed_at: Option<i64>,
    pub sold_at: Option<i64>,
}

/// Serial joined with its customer, product and order (search result)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SerialDetail {
    pub id: i64,
    pub code: String,
    pub status: SerialStatus,
    pub is_damaged: bool,
    pub is_reusable: bool,
    pub assigned_at: i64,
    pub printed_at: Option<i64>,
    pub sold_at: Option<i64>,
    pub product_id: i64,
    pub product_name: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub order_id: i64,
    pub order_number: String,
}
