//! Unified error codes for the seal fulfillment service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Invoice errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product / stock errors
//! - 7xxx: Serial number errors
//! - 8xxx: Printing job errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller identity is missing
    NotAuthenticated = 1001,
    /// Caller role is not one of the known roles
    UnknownRole = 1002,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 3xxx: Invoice ====================
    /// Invoice not found
    InvoiceNotFound = 3001,
    /// Order already has an invoice
    InvoiceAlreadyExists = 3002,
    /// Invoice has already been paid in full
    InvoiceAlreadyPaid = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order status does not allow the requested operation
    OrderInvalidTransition = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Customer not found
    CustomerNotFound = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment amount is not a positive finite number
    PaymentInvalidAmount = 5001,
    /// Payment not found
    PaymentNotFound = 5002,
    /// Receipt not found
    ReceiptNotFound = 5003,
    /// Payment already has a receipt
    ReceiptAlreadyIssued = 5004,

    // ==================== 6xxx: Product / Stock ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is inactive
    ProductInactive = 6002,
    /// Not enough available stock
    InsufficientStock = 6003,
    /// Product has no stock record
    StockNotFound = 6004,

    // ==================== 7xxx: Serial ====================
    /// Serial code does not match the expected format
    SerialInvalidFormat = 7001,
    /// Serial range length differs from the item quantity
    SerialRangeMismatch = 7002,
    /// Serial code already issued
    SerialDuplicate = 7003,
    /// Serial code not found
    SerialNotFound = 7004,

    // ==================== 8xxx: Printing ====================
    /// Printing job not found
    PrintingJobNotFound = 8001,
    /// Printing job status cannot move backwards
    PrintingJobInvalidTransition = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Stock counters would have gone negative
    StockInvariantViolated = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::UnknownRole => "Unknown role",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",

            // Invoice
            ErrorCode::InvoiceNotFound => "Invoice not found",
            ErrorCode::InvoiceAlreadyExists => "Order has already been invoiced",
            ErrorCode::InvoiceAlreadyPaid => "Invoice has already been paid",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderInvalidTransition => "Order status does not allow this operation",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::CustomerNotFound => "Customer not found",

            // Payment
            ErrorCode::PaymentInvalidAmount => "Invalid payment amount",
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::ReceiptNotFound => "Receipt not found",
            ErrorCode::ReceiptAlreadyIssued => "Receipt already issued for payment",

            // Product / Stock
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInactive => "Product is inactive",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::StockNotFound => "Stock record not found",

            // Serial
            ErrorCode::SerialInvalidFormat => "Invalid serial format",
            ErrorCode::SerialRangeMismatch => "Serial range does not match quantity",
            ErrorCode::SerialDuplicate => "Serial number already issued",
            ErrorCode::SerialNotFound => "Serial number not found",

            // Printing
            ErrorCode::PrintingJobNotFound => "Printing job not found",
            ErrorCode::PrintingJobInvalidTransition => "Printing job status cannot move backwards",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StockInvariantViolated => "Stock ledger invariant violated",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::UnknownRole),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),

            // Invoice
            3001 => Ok(ErrorCode::InvoiceNotFound),
            3002 => Ok(ErrorCode::InvoiceAlreadyExists),
            3003 => Ok(ErrorCode::InvoiceAlreadyPaid),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderInvalidTransition),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::CustomerNotFound),

            // Payment
            5001 => Ok(ErrorCode::PaymentInvalidAmount),
            5002 => Ok(ErrorCode::PaymentNotFound),
            5003 => Ok(ErrorCode::ReceiptNotFound),
            5004 => Ok(ErrorCode::ReceiptAlreadyIssued),

            // Product / Stock
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInactive),
            6003 => Ok(ErrorCode::InsufficientStock),
            6004 => Ok(ErrorCode::StockNotFound),

            // Serial
            7001 => Ok(ErrorCode::SerialInvalidFormat),
            7002 => Ok(ErrorCode::SerialRangeMismatch),
            7003 => Ok(ErrorCode::SerialDuplicate),
            7004 => Ok(ErrorCode::SerialNotFound),

            // Printing
            8001 => Ok(ErrorCode::PrintingJobNotFound),
            8002 => Ok(ErrorCode::PrintingJobInvalidTransition),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::StockInvariantViolated),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
