//! Shared types for the seal fulfillment service
//!
//! Domain models, the unified error system, role policy and
//! money/time helpers used by the server and its API clients.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
