//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity (read-only here, managed by the CRUD side)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub company_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: i64,
}
