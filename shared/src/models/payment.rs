//! Payment Model

use super::invoice::InvoiceStatus;
use super::order::{OrderStatus, PaymentStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentMethod {
    #[default]
    Cash,
    BankTransfer,
    Cheque,
    Card,
}

/// Payment received against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub payment_number: String,
    pub invoice_id: i64,
    pub order_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    pub received_by: i64,
    pub notes: Option<String>,
    pub paid_at: i64,
}

/// Record payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub invoice_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
}

/// Result of recording a payment, after reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub payment: Payment,
    pub paid_to_date: f64,
    pub outstanding: f64,
    pub invoice_status: InvoiceStatus,
    pub order_payment_status: PaymentStatus,
    pub order_status: OrderStatus,
}
