//! Receipt Model

use serde::{Deserialize, Serialize};

/// Receipt issued for one payment; the amount is copied from the payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Receipt {
    pub id: i64,
    pub receipt_number: String,
    pub payment_id: i64,
    pub amount: f64,
    pub issued_by: i64,
    pub created_at: i64,
}

/// Issue receipt payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptCreate {
    pub payment_id: i64,
}
