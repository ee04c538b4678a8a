//! Sales Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfillment status of a sales order
///
/// ```text
/// created → waiting_print → in_progress → job_done → invoiced → completed
///    └───────────┴───────────────┴──→ cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Created,
    WaitingPrint,
    InProgress,
    JobDone,
    Invoiced,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::WaitingPrint => "waiting_print",
            Self::InProgress => "in_progress",
            Self::JobDone => "job_done",
            Self::Invoiced => "invoiced",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the workflow permits moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Created, WaitingPrint)
                | (WaitingPrint, InProgress)
                | (InProgress, JobDone)
                | (JobDone, Invoiced)
                | (Invoiced, Completed)
                | (Created | WaitingPrint | InProgress, Cancelled)
        )
    }

    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }

    /// Serials have been physically printed (or printing has started)
    pub fn is_past_printing_start(&self) -> bool {
        !matches!(self, Self::Created | Self::WaitingPrint | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
}

/// How the seal is printed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PrintingType {
    #[default]
    NormalSerial,
    Barcode,
    QrCode,
}

/// Sales order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalesOrder {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub quotation_id: Option<i64>,
    pub created_by: i64,
    pub order_date: i64,
    pub completion_date: Option<i64>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<i64>,
    pub cancelled_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line with its serial range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub serial_start: String,
    pub serial_end: String,
    pub printing_type: PrintingType,
}

/// Order with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: SalesOrder,
    pub items: Vec<OrderItem>,
}

/// Line input for order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    /// Defaults to `quantity * unit_price`
    pub total_price: Option<f64>,
    pub serial_start: String,
    pub serial_end: String,
    #[serde(default)]
    pub printing_type: PrintingType,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub quotation_id: Option<i64>,
    /// Defaults to now
    pub order_date: Option<i64>,
    pub items: Vec<OrderItemInput>,
}

/// Cancel order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancel {
    pub reason: String,
    /// Serials already went to the printer; treat the stock as damaged
    #[serde(default)]
    pub after_printing: bool,
}
