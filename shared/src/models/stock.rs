//! Stock ledger models
//!
//! One [`Stock`] row per product. The buckets `available + reserved + sold +
//! damaged + sample` only move between each other; receiving goods (GRN) is
//! the only way the total grows.

use serde::{Deserialize, Serialize};

/// Per-product stock counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Stock {
    pub product_id: i64,
    pub available: i64,
    pub reserved: i64,
    pub sold: i64,
    pub damaged: i64,
    pub sample: i64,
    /// Cumulative quantity received through GRNs
    pub received: i64,
    pub updated_at: i64,
}

impl Stock {
    /// Units physically accounted for across all buckets
    pub fn total(&self) -> i64 {
        self.available + self.reserved + self.sold + self.damaged + self.sample
    }
}

/// Stock row joined with its product, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: i64,
    pub product_name: String,
    pub minimum_threshold: i64,
    pub available: i64,
    pub reserved: i64,
    pub sold: i64,
    pub damaged: i64,
    pub sample: i64,
    pub received: i64,
    pub updated_at: i64,
}

/// Active product whose available stock dropped below its threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub available: i64,
    pub minimum_threshold: i64,
}

/// Goods received note
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Grn {
    pub id: i64,
    pub grn_number: String,
    pub product_id: i64,
    pub quantity: i64,
    pub supplier_name: Option<String>,
    pub received_at: i64,
    pub received_by: i64,
    pub notes: Option<String>,
}

/// Receive stock payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrnCreate {
    pub product_id: i64,
    pub quantity: i64,
    pub supplier_name: Option<String>,
    pub notes: Option<String>,
}

/// Damage report moving available units into the damaged bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockDamage {
    pub id: i64,
    pub product_id: i64,
    pub order_id: Option<i64>,
    pub quantity: i64,
    pub reason: String,
    pub recorded_by: i64,
    pub notes: Option<String>,
    pub recorded_at: i64,
}

/// Record damage payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDamageCreate {
    pub product_id: i64,
    pub order_id: Option<i64>,
    pub quantity: i64,
    pub reason: String,
    pub notes: Option<String>,
}
