//! Product Model

use serde::{Deserialize, Serialize};

/// Product lifecycle status (soft delete)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    /// Stock alert threshold for `available`
    pub minimum_threshold: i64,
    pub status: ProductStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload (creates the stock row too)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub minimum_threshold: Option<i64>,
}
