//! Stock Repository (reads)
//!
//! Counter mutations live in `fulfillment::ledger`.

use super::RepoResult;
use shared::models::{ProductStatus, Stock, StockAlert, StockLevel};
use sqlx::SqliteExecutor;

/// Stock counters joined with the product fields the workflow checks
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductStock {
    pub product_id: i64,
    pub product_name: String,
    pub product_status: ProductStatus,
    pub available: i64,
}

pub async fn find(db: impl SqliteExecutor<'_>, product_id: i64) -> RepoResult<Option<Stock>> {
    let stock = sqlx::query_as::<_, Stock>(
        "SELECT product_id, available, reserved, sold, damaged, sample, received, updated_at \
         FROM stock WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_optional(db)
    .await?;
    Ok(stock)
}

/// `None` when the product does not exist; a product without a stock row
/// reads as zero available
pub async fn find_with_product(
    db: impl SqliteExecutor<'_>,
    product_id: i64,
) -> RepoResult<Option<ProductStock>> {
    let row = sqlx::query_as::<_, ProductStock>(
        "SELECT p.id AS product_id, p.name AS product_name, p.status AS product_status, \
         COALESCE(s.available, 0) AS available \
         FROM product p LEFT JOIN stock s ON s.product_id = p.id WHERE p.id = ?",
    )
    .bind(product_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<StockLevel>> {
    let levels = sqlx::query_as::<_, StockLevel>(
        "SELECT s.product_id, p.name AS product_name, p.minimum_threshold, s.available, \
         s.reserved, s.sold, s.damaged, s.sample, s.received, s.updated_at \
         FROM stock s JOIN product p ON p.id = s.product_id ORDER BY p.name",
    )
    .fetch_all(db)
    .await?;
    Ok(levels)
}

/// Active products whose available stock is below their threshold
pub async fn alerts(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<StockAlert>> {
    let alerts = sqlx::query_as::<_, StockAlert>(
        "SELECT s.product_id, p.name AS product_name, s.available, p.minimum_threshold \
         FROM stock s JOIN product p ON p.id = s.product_id \
         WHERE p.status = 'active' AND s.available < p.minimum_threshold \
         ORDER BY s.available ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(alerts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product;
    use crate::fulfillment::testing::TestDb;
    use shared::models::ProductCreate;
    use sqlx::SqliteConnection;

    async fn product_with(
        conn: &mut SqliteConnection,
        name: &str,
        threshold: i64,
        available: i64,
    ) -> i64 {
        let product = product::create(
            &mut *conn,
            ProductCreate {
                name: name.to_string(),
                description: None,
                unit_price: 4.0,
                minimum_threshold: Some(threshold),
            },
        )
        .await
        .unwrap();
        sqlx::query("UPDATE stock SET available = ?1, received = ?1 WHERE product_id = ?2")
            .bind(available)
            .bind(product.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        product.id
    }

    #[tokio::test]
    async fn test_alerts_only_active_products_strictly_below_threshold() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;
        let low = product_with(&mut conn, "Cable seal", 20, 5).await;
        let lowest = product_with(&mut conn, "Meter seal", 20, 2).await;
        let at_threshold = product_with(&mut conn, "Bolt seal", 20, 20).await;
        let retired = product_with(&mut conn, "Padlock seal", 20, 1).await;
        product::set_status(&mut *conn, retired, ProductStatus::Inactive)
            .await
            .unwrap();

        let found = alerts(&mut *conn).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|a| a.product_id).collect();
        assert_eq!(ids, [lowest, low]);
        assert!(!ids.contains(&at_threshold));
        assert_eq!(found[0].product_name, "Meter seal");
        assert_eq!((found[0].available, found[0].minimum_threshold), (2, 20));
    }

    #[tokio::test]
    async fn test_zero_threshold_never_alerts() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;
        product_with(&mut conn, "Bolt seal", 0, 0).await;

        assert!(alerts(&mut *conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_with_product_reads_missing_stock_row_as_zero() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;
        let id = product_with(&mut conn, "Bolt seal", 0, 9).await;

        let found = find_with_product(&mut *conn, id).await.unwrap().unwrap();
        assert_eq!((found.product_name.as_str(), found.available), ("Bolt seal", 9));

        sqlx::query("DELETE FROM stock WHERE product_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .unwrap();
        let found = find_with_product(&mut *conn, id).await.unwrap().unwrap();
        assert_eq!(found.available, 0);
        assert_eq!(found.product_status, ProductStatus::Active);

        assert!(find_with_product(&mut *conn, 4242).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_product_name() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;
        product_with(&mut conn, "Meter seal", 10, 3).await;
        product_with(&mut conn, "Bolt seal", 10, 30).await;

        let names: Vec<String> = list(&mut *conn)
            .await
            .unwrap()
            .into_iter()
            .map(|level| level.product_name)
            .collect();
        assert_eq!(names, ["Bolt seal", "Meter seal"]);
    }
}
