//! Invoice Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum InvoiceType {
    #[default]
    Normal,
    Tax,
}

/// Invoice entity (at most one per order)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub order_id: i64,
    pub customer_id: i64,
    pub invoice_type: InvoiceType,
    pub due_date: Option<i64>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub status: InvoiceStatus,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create invoice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub order_id: i64,
    #[serde(default)]
    pub invoice_type: InvoiceType,
    pub due_date: Option<i64>,
    #[serde(default)]
    pub tax_amount: f64,
}

/// Unpaid invoice past its due date, with what has been paid so far
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OverdueInvoice {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub order_id: i64,
    pub customer_id: i64,
    pub due_date: i64,
    pub total_amount: f64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub paid_amount: f64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub outstanding: f64,
}
