//! Stock Damage Repository

use super::RepoResult;
use shared::models::StockDamage;
use sqlx::SqliteExecutor;

const SELECT_DAMAGE: &str =
    "SELECT id, product_id, order_id, quantity, reason, recorded_by, notes, recorded_at \
     FROM stock_damage";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<StockDamage>> {
    let damage = sqlx::query_as::<_, StockDamage>(&format!("{SELECT_DAMAGE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(damage)
}

pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<StockDamage>> {
    let damages = sqlx::query_as::<_, StockDamage>(&format!(
        "{SELECT_DAMAGE} ORDER BY recorded_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(damages)
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    product_id: i64,
    order_id: Option<i64>,
    quantity: i64,
    reason: &str,
    recorded_by: i64,
    notes: Option<&str>,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO stock_damage (product_id, order_id, quantity, reason, recorded_by, notes, \
         recorded_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(product_id)
    .bind(order_id)
    .bind(quantity)
    .bind(reason)
    .bind(recorded_by)
    .bind(notes)
    .bind(shared::util::now_millis())
    .fetch_one(db)
    .await?;
    Ok(id)
}
