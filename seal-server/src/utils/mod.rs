//! Utilities - shared error types, logging, validation
//!
//! - [`AppError`] / [`ApiResponse`] from `shared::error`
//! - [`logger`] - tracing subscriber setup
//! - [`validation`] - text and quantity checks for workflow input

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
