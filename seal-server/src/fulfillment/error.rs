//! Fulfillment error types
//!
//! `FulfillmentError` is what every ledger, serial and workflow step
//! returns. The HTTP layer converts it into the shared [`AppError`].

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::models::{JobStatus, OrderStatus};
use std::fmt;
use thiserror::Error;

/// Serial range input problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialRangeError {
    #[error("invalid serial format: {0}")]
    InvalidFormat(String),

    #[error("serial range covers {actual} codes but quantity is {expected}")]
    RangeQuantityMismatch { expected: i64, actual: u64 },
}

/// Entity kinds reported by [`FulfillmentError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Customer,
    Product,
    Stock,
    Order,
    PrintingJob,
    Invoice,
    Payment,
    Receipt,
}

impl Resource {
    fn error_code(&self) -> ErrorCode {
        match self {
            Resource::Customer => ErrorCode::CustomerNotFound,
            Resource::Product => ErrorCode::ProductNotFound,
            Resource::Stock => ErrorCode::StockNotFound,
            Resource::Order => ErrorCode::OrderNotFound,
            Resource::PrintingJob => ErrorCode::PrintingJobNotFound,
            Resource::Invoice => ErrorCode::InvoiceNotFound,
            Resource::Payment => ErrorCode::PaymentNotFound,
            Resource::Receipt => ErrorCode::ReceiptNotFound,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Customer => "Customer",
            Resource::Product => "Product",
            Resource::Stock => "Stock",
            Resource::Order => "Order",
            Resource::PrintingJob => "Printing job",
            Resource::Invoice => "Invoice",
            Resource::Payment => "Payment",
            Resource::Receipt => "Receipt",
        })
    }
}

#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error(transparent)]
    SerialRange(#[from] SerialRangeError),

    #[error("{0}")]
    Validation(String),

    #[error("insufficient stock for {product_name}: available {available}, required {required}")]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        required: i64,
    },

    #[error("serial number {code} already issued")]
    DuplicateSerial { code: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error("product {product_id} is inactive")]
    ProductInactive { product_id: i64 },

    #[error("{0}")]
    Forbidden(String),

    #[error("order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("printing job {job_id} cannot move from {from} to {to}")]
    InvalidJobTransition {
        job_id: i64,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("order {order_id} already has an invoice")]
    AlreadyInvoiced { order_id: i64 },

    #[error("invoice {invoice_id} is already paid")]
    InvoicePaid { invoice_id: i64 },

    #[error("payment {payment_id} already has a receipt")]
    ReceiptAlreadyIssued { payment_id: i64 },

    #[error("invalid payment amount: {0}")]
    InvalidAmount(f64),

    #[error("stock ledger invariant violated: {0}")]
    LedgerInvariant(String),

    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl FulfillmentError {
    pub fn not_found(resource: Resource, id: i64) -> Self {
        FulfillmentError::NotFound { resource, id }
    }

    /// Business rejections are expected; everything else is a fault.
    pub fn is_business_rejection(&self) -> bool {
        !matches!(
            self,
            FulfillmentError::LedgerInvariant(_)
                | FulfillmentError::Timeout(_)
                | FulfillmentError::Database(_)
                | FulfillmentError::Repo(RepoError::Database(_))
        )
    }
}

pub type FulfillmentResult<T> = Result<T, FulfillmentError>;

impl From<FulfillmentError> for AppError {
    fn from(err: FulfillmentError) -> Self {
        let message = err.to_string();
        match err {
            FulfillmentError::SerialRange(SerialRangeError::InvalidFormat(input)) => {
                AppError::with_message(ErrorCode::SerialInvalidFormat, message)
                    .with_detail("input", input)
            }
            FulfillmentError::SerialRange(SerialRangeError::RangeQuantityMismatch {
                expected,
                actual,
            }) => AppError::with_message(ErrorCode::SerialRangeMismatch, message)
                .with_detail("expected", expected)
                .with_detail("actual", actual),
            FulfillmentError::Validation(msg) => AppError::validation(msg),
            FulfillmentError::InsufficientStock {
                product_id,
                product_name,
                available,
                required,
            } => AppError::insufficient_stock(product_id, product_name, available, required),
            FulfillmentError::DuplicateSerial { code } => AppError::duplicate_serial(code),
            FulfillmentError::NotFound { resource, id } => {
                AppError::with_message(resource.error_code(), message).with_detail("id", id)
            }
            FulfillmentError::ProductInactive { product_id } => {
                AppError::with_message(ErrorCode::ProductInactive, message)
                    .with_detail("product_id", product_id)
            }
            FulfillmentError::Forbidden(msg) => AppError::permission_denied(msg),
            FulfillmentError::InvalidTransition { order_id, from, to } => {
                let code = if from == OrderStatus::Cancelled {
                    ErrorCode::OrderAlreadyCancelled
                } else {
                    ErrorCode::OrderInvalidTransition
                };
                AppError::with_message(code, message)
                    .with_detail("order_id", order_id)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            FulfillmentError::InvalidJobTransition { job_id, from, to } => {
                AppError::with_message(ErrorCode::PrintingJobInvalidTransition, message)
                    .with_detail("job_id", job_id)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            FulfillmentError::AlreadyInvoiced { order_id } => {
                AppError::with_message(ErrorCode::InvoiceAlreadyExists, message)
                    .with_detail("order_id", order_id)
            }
            FulfillmentError::InvoicePaid { invoice_id } => {
                AppError::with_message(ErrorCode::InvoiceAlreadyPaid, message)
                    .with_detail("invoice_id", invoice_id)
            }
            FulfillmentError::ReceiptAlreadyIssued { payment_id } => {
                AppError::with_message(ErrorCode::ReceiptAlreadyIssued, message)
                    .with_detail("payment_id", payment_id)
            }
            FulfillmentError::InvalidAmount(_) => {
                AppError::with_message(ErrorCode::PaymentInvalidAmount, message)
            }
            FulfillmentError::LedgerInvariant(cause) => {
                AppError::new(ErrorCode::StockInvariantViolated).with_detail("cause", cause)
            }
            FulfillmentError::Timeout(_) => AppError::timeout(message),
            FulfillmentError::Repo(repo) => repo.into(),
            FulfillmentError::Database(e) => {
                tracing::error!(error = %e, "Fulfillment database error");
                AppError::database("Database error").with_detail("cause", e.to_string())
            }
        }
    }
}
