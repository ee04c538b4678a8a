//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::InvoiceNotFound
            | Self::OrderNotFound
            | Self::CustomerNotFound
            | Self::PaymentNotFound
            | Self::ReceiptNotFound
            | Self::ProductNotFound
            | Self::StockNotFound
            | Self::SerialNotFound
            | Self::PrintingJobNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::InvoiceAlreadyExists
            | Self::InvoiceAlreadyPaid
            | Self::OrderInvalidTransition
            | Self::OrderAlreadyCancelled
            | Self::ReceiptAlreadyIssued
            | Self::SerialDuplicate
            | Self::PrintingJobInvalidTransition => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::UnknownRole => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired => StatusCode::FORBIDDEN,

            // 422 Unprocessable (business rule)
            Self::InsufficientStock | Self::ProductInactive => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StockInvariantViolated => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
