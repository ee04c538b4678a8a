//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductStatus};
use sqlx::{SqliteConnection, SqliteExecutor};

const SELECT_PRODUCT: &str =
    "SELECT id, name, description, unit_price, minimum_threshold, status, created_at, updated_at \
     FROM product";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(product)
}

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY name"))
        .fetch_all(db)
        .await?;
    Ok(products)
}

/// Insert a product together with its (empty) stock row
pub async fn create(conn: &mut SqliteConnection, data: ProductCreate) -> RepoResult<Product> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("product name must not be empty".into()));
    }
    if !shared::money::is_valid_amount(data.unit_price) {
        return Err(RepoError::Validation(format!(
            "unit_price must be a finite non-negative number, got {}",
            data.unit_price
        )));
    }
    let threshold = data.minimum_threshold.unwrap_or(0);
    if threshold < 0 {
        return Err(RepoError::Validation(format!(
            "minimum_threshold must be non-negative, got {threshold}"
        )));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product (name, description, unit_price, minimum_threshold, status, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'active', ?5, ?5) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.unit_price)
    .bind(threshold)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("INSERT INTO stock (product_id, updated_at) VALUES (?, ?)")
        .bind(id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Soft delete / reactivate
pub async fn set_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    status: ProductStatus,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE product SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::stock;
    use crate::fulfillment::testing::TestDb;

    fn payload(name: &str, unit_price: f64, threshold: Option<i64>) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            description: None,
            unit_price,
            minimum_threshold: threshold,
        }
    }

    #[tokio::test]
    async fn test_create_opens_empty_stock_row() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;

        let product = create(&mut conn, payload("  Bolt seal ", 3.5, None)).await.unwrap();
        assert_eq!(product.name, "Bolt seal");
        assert_eq!(product.minimum_threshold, 0);
        assert_eq!(product.status, ProductStatus::Active);

        let counters = stock::find(&mut *conn, product.id).await.unwrap().unwrap();
        assert_eq!(
            (counters.available, counters.reserved, counters.received),
            (0, 0, 0)
        );
    }

    #[tokio::test]
    async fn test_create_rejects_bad_payloads() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;

        for bad in [
            payload(" ", 1.0, None),
            payload("Bolt seal", -1.0, None),
            payload("Bolt seal", f64::NAN, None),
            payload("Bolt seal", 1.0, Some(-5)),
        ] {
            let err = create(&mut conn, bad).await.unwrap_err();
            assert!(matches!(err, RepoError::Validation(_)));
        }
        assert!(find_all(&mut *conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status_soft_deletes_and_reports_unknown_id() {
        let db = TestDb::new().await;
        let mut conn = db.conn().await;
        let product = create(&mut conn, payload("Bolt seal", 1.0, Some(10))).await.unwrap();

        set_status(&mut *conn, product.id, ProductStatus::Inactive)
            .await
            .unwrap();
        let stored = find_by_id(&mut *conn, product.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProductStatus::Inactive);

        let err = set_status(&mut *conn, 999, ProductStatus::Active).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
