//! Data models
//!
//! Shared between seal-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod customer;
pub mod invoice;
pub mod order;
pub mod payment;
pub mod printing_job;
pub mod product;
pub mod receipt;
pub mod role;
pub mod serial;
pub mod stock;

// Re-exports
pub use customer::*;
pub use invoice::*;
pub use order::*;
pub use payment::*;
pub use printing_job::*;
pub use product::*;
pub use receipt::*;
pub use role::*;
pub use serial::*;
pub use stock::*;
